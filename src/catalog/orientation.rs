//! Ordered keyword rules with a geometric fallback for slot orientation

use crate::catalog::slot::Orientation;

/// Maps a lower-case name fragment to an orientation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordRule {
    /// Lower-case substring tested against node names
    pub keyword: String,
    /// Orientation returned when the keyword matches
    pub orientation: Orientation,
}

impl KeywordRule {
    /// Create a rule; the keyword is lower-cased
    pub fn new(keyword: &str, orientation: Orientation) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            orientation,
        }
    }
}

/// World-space measurements of a node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    /// Local mesh bounding-box extents, if the node renders a mesh
    pub mesh_size: Option<[f32; 3]>,
    /// Accumulated world scale
    pub world_scale: [f32; 3],
}

impl Geometry {
    /// Extents in world units; raw scale magnitudes when there is no mesh
    pub fn world_extents(&self) -> [f32; 3] {
        let [sx, sy, sz] = self.world_scale;
        match self.mesh_size {
            Some([x, y, z]) => [(x * sx).abs(), (y * sy).abs(), (z * sz).abs()],
            None => [sx.abs(), sy.abs(), sz.abs()],
        }
    }

    /// Second-largest and largest extents, read as plane (width, height)
    pub fn plane_extents(&self) -> (f32, f32) {
        let mut dims = self.world_extents();
        dims.sort_by(f32::total_cmp);
        let [_, width, height] = dims;
        (width, height)
    }
}

/// Decides portrait vs. landscape for a node
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrientationClassifier {
    rules: Vec<KeywordRule>,
}

impl Default for OrientationClassifier {
    fn default() -> Self {
        Self::new(vec![
            KeywordRule::new("vertical", Orientation::Portrait),
            KeywordRule::new("portrait", Orientation::Portrait),
            KeywordRule::new("縦", Orientation::Portrait),
            KeywordRule::new("horizontal", Orientation::Landscape),
            KeywordRule::new("landscape", Orientation::Landscape),
            KeywordRule::new("横", Orientation::Landscape),
        ])
    }
}

impl OrientationClassifier {
    /// Create a classifier evaluating `rules` in order
    pub const fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Append a rule evaluated after the existing ones
    #[must_use]
    pub fn with_rule(mut self, keyword: &str, orientation: Orientation) -> Self {
        self.rules.push(KeywordRule::new(keyword, orientation));
        self
    }

    /// Orientation implied by one node name, if any rule matches
    pub fn match_name(&self, name: &str) -> Option<Orientation> {
        let lowered = name.to_lowercase();
        self.rules
            .iter()
            .find(|rule| lowered.contains(&rule.keyword))
            .map(|rule| rule.orientation)
    }

    /// First keyword match walking from the node (`lineage[0]`) up to the root
    pub fn match_lineage<'a, I>(&self, lineage: I) -> Option<Orientation>
    where
        I: IntoIterator<Item = &'a str>,
    {
        lineage.into_iter().find_map(|name| self.match_name(name))
    }

    /// Classify a node from its names (node first, then ancestors) and geometry
    ///
    /// Name rules always win over geometry. The geometric rule treats the
    /// largest extent as height, so a node without a name match is portrait.
    pub fn classify<'a, I>(&self, lineage: I, geometry: &Geometry) -> Orientation
    where
        I: IntoIterator<Item = &'a str>,
    {
        if let Some(by_name) = self.match_lineage(lineage) {
            return by_name;
        }
        let (width, height) = geometry.plane_extents();
        if height >= width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}
