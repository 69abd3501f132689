use super::{build_query, QueryDescriptor};
use crate::params::QueryParameters;
use crate::tag::Tag;

/// One count query per tag, in enumeration order.
///
/// Each descriptor is what a `tag=<t>` search would build, so storage can run
/// them independently and in any order.
pub fn tag_count_plan() -> Vec<(Tag, QueryDescriptor)> {
    Tag::ALL
        .iter()
        .map(|&tag| {
            let params = QueryParameters {
                tag: Some(tag),
                ..QueryParameters::default()
            };
            (tag, build_query(&params))
        })
        .collect()
}
