//! Fixed table of the genres we know how to browse.

use rand::seq::IndexedRandom;

/// Provider id meaning "no genre". Unknown names resolve to it.
pub const NO_GENRE_ID: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Genre {
    pub name: &'static str,
    pub id: i64,
}

pub const GENRE_CATALOG: &[Genre] = &[
    Genre { name: "pop", id: 132 },
    Genre { name: "rock", id: 152 },
    Genre { name: "hip-hop", id: 116 },
    Genre { name: "jazz", id: 129 },
    Genre { name: "classical", id: 98 },
    Genre { name: "electronic", id: 106 },
    Genre { name: "rnb", id: 165 },
    Genre { name: "reggae", id: 144 },
    Genre { name: "metal", id: 464 },
    Genre { name: "country", id: 84 },
];

/// Genre names in catalog order.
pub fn genre_names() -> Vec<&'static str> {
    GENRE_CATALOG.iter().map(|genre| genre.name).collect()
}

/// Case-insensitive lookup, [`NO_GENRE_ID`] when the name is unknown.
pub fn genre_id(name: &str) -> i64 {
    let name = name.to_lowercase();
    GENRE_CATALOG
        .iter()
        .find(|genre| genre.name == name)
        .map(|genre| genre.id)
        .unwrap_or(NO_GENRE_ID)
}

pub fn random_genre() -> &'static Genre {
    // The catalog is a non-empty constant.
    GENRE_CATALOG
        .choose(&mut rand::rng())
        .unwrap_or(&GENRE_CATALOG[0])
}
