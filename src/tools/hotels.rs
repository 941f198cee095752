use super::pricing::Comfort;
use crate::types::Hotel;

const MAX_SUGGESTIONS: usize = 2;

struct CatalogHotel {
    name: &'static str,
    price_per_night: f64,
    rating: f64,
    kind: &'static str,
}

const fn hotel(
    name: &'static str,
    price_per_night: f64,
    rating: f64,
    kind: &'static str,
) -> CatalogHotel {
    CatalogHotel {
        name,
        price_per_night,
        rating,
        kind,
    }
}

const LISBON: &[CatalogHotel] = &[
    hotel("casa do bairro alfama", 95.0, 4.4, "guesthouse"),
    hotel("baixa riverside suites", 140.0, 4.3, "hotel"),
    hotel("chiado boutique rooms", 210.0, 4.6, "boutique"),
    hotel("palácio tejo grand", 340.0, 4.8, "luxury"),
];

const CANARY_ISLANDS: &[CatalogHotel] = &[
    hotel("las américas surf house", 70.0, 4.2, "hostel"),
    hotel("puerto de la cruz apartments", 120.0, 4.3, "apartment"),
    hotel("costa adeje beach resort", 230.0, 4.5, "resort"),
    hotel("volcán spa & villas", 380.0, 4.7, "luxury"),
];

const CRETE: &[CatalogHotel] = &[
    hotel("chania harbour rooms", 85.0, 4.4, "guesthouse"),
    hotel("rethymno old town hotel", 130.0, 4.4, "hotel"),
    hotel("elounda bay villas", 260.0, 4.7, "villa"),
    hotel("agios nikolaos cliff resort", 420.0, 4.8, "luxury"),
];

const NICE: &[CatalogHotel] = &[
    hotel("vieux nice budget inn", 110.0, 4.0, "hotel"),
    hotel("promenade azur hotel", 190.0, 4.4, "hotel"),
    hotel("cimiez belle époque", 245.0, 4.6, "boutique"),
    hotel("riviera palace negresco", 520.0, 4.9, "luxury"),
];

fn catalog_for(destination: &str) -> &'static [CatalogHotel] {
    match destination {
        "Lisbon, Portugal" => LISBON,
        "Canary Islands, Spain" => CANARY_ISLANDS,
        "Crete, Greece" => CRETE,
        "Nice, France" => NICE,
        _ => &[],
    }
}

fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Up to two catalog hotels inside the comfort tier's price band.
///
/// Unknown destinations have no catalog and yield an empty list.
pub(crate) fn hotels_for(destination: &str, comfort: Comfort) -> Vec<Hotel> {
    catalog_for(destination)
        .iter()
        .filter(|entry| comfort.admits(entry.price_per_night))
        .take(MAX_SUGGESTIONS)
        .map(|entry| Hotel {
            name: capitalize_first(entry.name),
            price_per_night: entry.price_per_night,
            rating: Some(entry.rating),
            kind: Some(entry.kind.to_string()),
        })
        .collect()
}
