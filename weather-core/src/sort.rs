use std::cmp::Ordering;

use crate::model::{Favourite, WeatherSnapshot};

/// How the favourites list is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    #[default]
    Alphabetic,
    Temperature,
    Country,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [SortMode::Alphabetic, SortMode::Temperature, SortMode::Country];

    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Alphabetic => "Alphabetic",
            SortMode::Temperature => "Temperature",
            SortMode::Country => "Country",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortMode::Alphabetic => SortMode::Temperature,
            SortMode::Temperature => SortMode::Country,
            SortMode::Country => SortMode::Alphabetic,
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Stable in-place sort.
///
/// The decoded modes place entries whose payload cannot be decoded after all
/// decodable ones, keeping their relative order.
pub fn sort_favourites(entries: &mut [Favourite], mode: SortMode) {
    match mode {
        SortMode::Alphabetic => entries.sort_by(|a, b| a.label.cmp(&b.label)),
        SortMode::Temperature => {
            sort_by_decoded(entries, |s| s.current.temp_c, |a, b| a.total_cmp(b))
        }
        SortMode::Country => {
            sort_by_decoded(entries, |s| s.location.country.clone(), |a, b| a.cmp(b))
        }
    }
}

fn sort_by_decoded<K>(
    entries: &mut [Favourite],
    key: impl Fn(&WeatherSnapshot) -> K,
    cmp: impl Fn(&K, &K) -> Ordering,
) {
    let key_of = |fav: &Favourite| WeatherSnapshot::decode(&fav.payload).ok().map(|s| key(&s));

    entries.sort_by(|a, b| match (key_of(a), key_of(b)) {
        (Some(ka), Some(kb)) => cmp(&ka, &kb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
