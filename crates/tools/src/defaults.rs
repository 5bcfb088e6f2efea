//! Static per-type defaults for created objects.

/// Size and paint applied when a creation tool leaves a field unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDefaults {
    pub width: f64,
    pub height: f64,
    pub fill: &'static str,
    pub stroke: Option<&'static str>,
    pub stroke_width: Option<f64>,
}

const fn outlined(width: f64, height: f64, fill: &'static str, stroke: &'static str, stroke_width: f64) -> ShapeDefaults {
    ShapeDefaults {
        width,
        height,
        fill,
        stroke: Some(stroke),
        stroke_width: Some(stroke_width),
    }
}

pub const STICKY_NOTE: ShapeDefaults = ShapeDefaults {
    width: 150.0,
    height: 150.0,
    fill: "#EAB308",
    stroke: None,
    stroke_width: None,
};

pub const RECTANGLE: ShapeDefaults = outlined(120.0, 80.0, "#0066FF", "#0044CC", 1.0);
pub const FREEDRAW: ShapeDefaults = outlined(0.0, 0.0, "transparent", "#1f2937", 3.0);
pub const CONNECTOR: ShapeDefaults = outlined(0.0, 0.0, "transparent", "#1f2937", 2.0);

/// Stroke used when a type's defaults carry none.
pub const FALLBACK_STROKE: &str = "#94a3b8";
pub const FALLBACK_STROKE_WIDTH: f64 = 1.0;

/// Types accepted by `createShape`.
pub const SHAPE_TYPES: [&str; 11] = [
    "rectangle",
    "rounded_rectangle",
    "circle",
    "ellipse",
    "triangle",
    "diamond",
    "star",
    "hexagon",
    "pentagon",
    "arrow",
    "line",
];

/// Sticky note palette, in the order the model is told about it.
pub const STICKY_COLORS: [&str; 8] = [
    "#EAB308", "#0066FF", "#DC2626", "#059669", "#F97316", "#7C3AED", "#EC4899", "#0D9488",
];

/// Size assumed for objects the store cannot size.
pub const UNKNOWN_OBJECT_SIZE: (f64, f64) = (150.0, 150.0);

/// Defaults for an object type, if it has any.
pub fn for_type(kind: &str) -> Option<ShapeDefaults> {
    let defaults = match kind {
        "sticky_note" => STICKY_NOTE,
        "rectangle" => RECTANGLE,
        "rounded_rectangle" => outlined(120.0, 80.0, "#7C3AED", "#6D28D9", 1.0),
        "circle" => outlined(100.0, 100.0, "#F97316", "#EA580C", 1.0),
        "ellipse" => outlined(140.0, 90.0, "#059669", "#047857", 1.0),
        "triangle" => outlined(120.0, 100.0, "#0D9488", "#0F766E", 1.0),
        "diamond" => outlined(100.0, 120.0, "#EAB308", "#CA8A04", 1.0),
        "star" => outlined(120.0, 120.0, "#EC4899", "#DB2777", 1.0),
        "arrow" => outlined(150.0, 4.0, "#1f2937", "#1f2937", 2.0),
        "line" => outlined(150.0, 0.0, "transparent", "#1f2937", 2.0),
        "hexagon" => outlined(110.0, 100.0, "#7C3AED", "#6D28D9", 1.0),
        "pentagon" => outlined(110.0, 100.0, "#EC4899", "#DB2777", 1.0),
        "freedraw" => FREEDRAW,
        "connector" => CONNECTOR,
        _ => return None,
    };
    Some(defaults)
}

/// A caller-supplied number, unless it is missing or zero.
pub(crate) fn number_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| *v != 0.0).unwrap_or(default)
}

/// A caller-supplied string, unless it is missing or empty.
pub(crate) fn text_or(value: Option<String>, default: &str) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_type_has_defaults() {
        for kind in SHAPE_TYPES {
            let d = for_type(kind).unwrap();
            assert!(d.stroke.is_some(), "{kind} should have a stroke");
        }
    }

    #[test]
    fn sticky_note_has_no_stroke() {
        let d = for_type("sticky_note").unwrap();
        assert_eq!((d.width, d.height, d.fill), (150.0, 150.0, "#EAB308"));
        assert!(d.stroke.is_none());
    }

    #[test]
    fn line_is_flat_and_transparent() {
        let d = for_type("line").unwrap();
        assert_eq!(d.height, 0.0);
        assert_eq!(d.fill, "transparent");
        assert_eq!(d.stroke_width, Some(2.0));
    }

    #[test]
    fn unknown_type_has_no_defaults() {
        assert!(for_type("cloud").is_none());
    }

    #[test]
    fn zero_and_empty_fall_back() {
        assert_eq!(number_or(Some(0.0), 120.0), 120.0);
        assert_eq!(number_or(Some(40.0), 120.0), 40.0);
        assert_eq!(text_or(Some(String::new()), "#fff"), "#fff");
        assert_eq!(text_or(None, "#fff"), "#fff");
    }
}
