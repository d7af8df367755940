//! The four atomic-design layers and per-layer pattern tables.

use serde::Deserialize;
use std::fmt;

/// An atomic-design layer, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Smallest presentational building blocks.
    Atoms,
    /// Compositions of atoms, may hold local state.
    Molecules,
    /// Compositions that talk to global state.
    Organisms,
    /// Page layouts.
    Templates,
}

impl Layer {
    /// All layers in ascending order.
    pub const ALL: [Layer; 4] = [
        Layer::Atoms,
        Layer::Molecules,
        Layer::Organisms,
        Layer::Templates,
    ];

    /// Lowercase plural name used in paths and messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Atoms => "atoms",
            Self::Molecules => "molecules",
            Self::Organisms => "organisms",
            Self::Templates => "templates",
        }
    }

    /// Layers that a file of this layer must not import from.
    ///
    /// Every layer is barred from the layers above it. Templates are also
    /// barred from other templates.
    #[must_use]
    pub fn forbidden_imports(self) -> &'static [Layer] {
        match self {
            Self::Atoms => &[Layer::Molecules, Layer::Organisms, Layer::Templates],
            Self::Molecules => &[Layer::Organisms, Layer::Templates],
            Self::Organisms | Self::Templates => &[Layer::Templates],
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One regex per layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerPatterns {
    /// Pattern for atoms.
    pub atoms: String,
    /// Pattern for molecules.
    pub molecules: String,
    /// Pattern for organisms.
    pub organisms: String,
    /// Pattern for templates.
    pub templates: String,
}

impl LayerPatterns {
    /// Pattern for `layer`.
    #[must_use]
    pub fn get(&self, layer: Layer) -> &String {
        match layer {
            Layer::Atoms => &self.atoms,
            Layer::Molecules => &self.molecules,
            Layer::Organisms => &self.organisms,
            Layer::Templates => &self.templates,
        }
    }

    /// Iterates `(layer, pattern)` in ascending layer order.
    pub fn iter(&self) -> impl Iterator<Item = (Layer, &String)> {
        Layer::ALL.into_iter().map(move |layer| (layer, self.get(layer)))
    }

    /// Replaces each pattern that `overrides` sets.
    #[must_use]
    pub fn merge(self, overrides: LayerPatternOverrides) -> Self {
        Self {
            atoms: overrides.atoms.unwrap_or(self.atoms),
            molecules: overrides.molecules.unwrap_or(self.molecules),
            organisms: overrides.organisms.unwrap_or(self.organisms),
            templates: overrides.templates.unwrap_or(self.templates),
        }
    }
}

/// User-supplied partial [`LayerPatterns`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerPatternOverrides {
    /// Pattern for atoms.
    #[serde(default)]
    pub atoms: Option<String>,
    /// Pattern for molecules.
    #[serde(default)]
    pub molecules: Option<String>,
    /// Pattern for organisms.
    #[serde(default)]
    pub organisms: Option<String>,
    /// Pattern for templates.
    #[serde(default)]
    pub templates: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> LayerPatterns {
        LayerPatterns {
            atoms: "a".into(),
            molecules: "m".into(),
            organisms: "o".into(),
            templates: "t".into(),
        }
    }

    #[test]
    fn layers_are_ordered() {
        assert!(Layer::Atoms < Layer::Molecules);
        assert!(Layer::Organisms < Layer::Templates);
    }

    #[test]
    fn forbidden_imports_point_upward_except_templates() {
        for layer in Layer::ALL {
            for target in layer.forbidden_imports() {
                assert!(*target > layer || layer == Layer::Templates);
            }
        }
        assert_eq!(Layer::Templates.forbidden_imports(), &[Layer::Templates]);
    }

    #[test]
    fn merge_replaces_only_given_keys() {
        let merged = patterns().merge(LayerPatternOverrides {
            organisms: Some("org".into()),
            ..LayerPatternOverrides::default()
        });
        assert_eq!(merged.get(Layer::Organisms), "org");
        assert_eq!(merged.get(Layer::Atoms), "a");
        assert_eq!(merged.iter().count(), 4);
    }
}
