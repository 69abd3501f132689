use super::{Criterion, Filter, Projection, QueryDescriptor, Scalar};
use crate::listing::ListingField;
use crate::params::QueryParameters;
use crate::price::PriceRange;
use rust_decimal::Decimal;

/// Translate validated read parameters into a [`QueryDescriptor`].
///
/// Pure: the same parameters always give the same descriptor. The price
/// range is already grammar-checked by its type.
pub fn build_query(params: &QueryParameters) -> QueryDescriptor {
    let mut filter = Filter::all();

    if let Some(item) = params.item.as_deref().filter(|s| !s.is_empty()) {
        filter = filter.with(
            ListingField::Title,
            Criterion::ContainsIgnoreCase(item.to_lowercase()),
        );
    }
    if let Some(tag) = params.tag {
        filter = filter.with(ListingField::Tags, Criterion::Includes(tag));
    }
    if let Some(for_sale) = params.for_sale {
        filter = filter.with(ListingField::ForSale, Criterion::Equals(Scalar::Bool(for_sale)));
    }
    if let Some(price) = params.price {
        filter = filter.with(ListingField::Price, price_criterion(price));
    }

    let descriptor = QueryDescriptor {
        filter,
        skip: params.skip.filter(|&n| n > 0),
        // Zero means unbounded for both paging values.
        limit: params.limit.filter(|&n| n > 0),
        sort: params.sort,
        projection: params
            .fields
            .clone()
            .map_or(Projection::All, Projection::Fields),
    };
    tracing::debug!(?descriptor, "Built listing query");
    descriptor
}

fn price_criterion(price: PriceRange) -> Criterion {
    match price {
        PriceRange::Exact(n) => Criterion::Equals(Scalar::Number(Decimal::from(n))),
        range => {
            let (min, max) = range.bounds();
            Criterion::Range {
                min: min.map(Decimal::from),
                max: max.map(Decimal::from),
            }
        }
    }
}
