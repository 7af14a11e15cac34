mod diff_renderer;
mod feature_collection;
mod geo_diff_types;
mod matcher;
mod normalized_record;
mod tabular_renderer;

pub use self::diff_renderer::{diff_feature_collection, diff_geojson_string};
pub use self::feature_collection::{DatasetError, FeatureCollection};
pub use self::geo_diff_types::{Match, MatchEntry, MatchKind, MatchSummary, PropertyMap};
pub use self::matcher::{surface_distance, MatchTable, Matcher, DEFAULT_TOLERANCE_METERS};
pub use self::normalized_record::NormalizedRecord;
pub use self::tabular_renderer::{short_title, tabular_rows, write_tabular, TabularRow};
