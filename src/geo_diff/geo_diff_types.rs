use geojson::JsonObject;

pub type PropertyMap = JsonObject;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Near,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    pub b_index: usize,
    pub kind: MatchKind,
    /// Meters. Always 0 for `MatchKind::Exact`.
    pub distance: f64,
    /// Labels of every B record within tolerance, only when more than one qualified.
    pub alternates: Option<Vec<String>>,
}

pub type MatchEntry = Option<Match>;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub total_a: usize,
    pub total_b: usize,
    pub unusable_a: usize,
    pub unusable_b: usize,
    pub exact: usize,
    pub near: usize,
    pub unmatched: usize,
}

#[inline]
pub fn label_a(index: usize) -> String {
    format!("A{}", index)
}

#[inline]
pub fn label_b(index: usize) -> String {
    format!("B{}", index)
}
