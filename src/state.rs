/// Shape parameters of the torus
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeSettings {
    /// Distance from the torus center to the center of the tube
    pub major_radius: f32,
    /// Radius of the tube
    pub minor_radius: f32,
    /// Segments around the main ring
    pub radial_segments: u32,
    /// Segments around the tube cross-section
    pub tubular_segments: u32,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        ShapeSettings {
            major_radius: 1.0,
            minor_radius: 1.0,
            radial_segments: 40,
            tubular_segments: 40,
        }
    }
}

/// Animation parameters of the torus
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSettings {
    /// Rotation speed in speed-units per tick
    pub rotation_speed: f32,
    pub rotate_x: bool,
    pub rotate_y: bool,
    pub rotate_z: bool,
    /// Advance the shader flow phase every tick
    pub flow_animation: bool,
    /// Six-band hue cycling in the fragment stage
    pub rainbow_mode: bool,
    /// Draw triangle edges instead of filled triangles
    pub wireframe: bool,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        AnimationSettings {
            rotation_speed: 1.0,
            rotate_x: true,
            rotate_y: true,
            rotate_z: false,
            flow_animation: true,
            rainbow_mode: false,
            wireframe: false,
        }
    }
}

/// User-controlled parameters, mutated only by panel edits and the reset routine
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Settings {
    pub shape: ShapeSettings,
    pub animation: AnimationSettings,
}

/// Reference to a single settings field, used by panel widgets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    MajorRadius,
    MinorRadius,
    RadialSegments,
    TubularSegments,
    RotationSpeed,
    RotateX,
    RotateY,
    RotateZ,
    FlowAnimation,
    RainbowMode,
    Wireframe,
}

impl Field {
    /// Shape fields require mesh regeneration when edited
    pub fn is_shape(self) -> bool {
        matches!(
            self,
            Field::MajorRadius | Field::MinorRadius | Field::RadialSegments | Field::TubularSegments
        )
    }

    /// Label shown next to the widget
    pub fn label(self) -> &'static str {
        match self {
            Field::MajorRadius => "Major radius",
            Field::MinorRadius => "Minor radius",
            Field::RadialSegments => "Radial segments",
            Field::TubularSegments => "Tubular segments",
            Field::RotationSpeed => "Rotation speed",
            Field::RotateX => "Rotate X",
            Field::RotateY => "Rotate Y",
            Field::RotateZ => "Rotate Z",
            Field::FlowAnimation => "Flow animation",
            Field::RainbowMode => "Rainbow mode",
            Field::Wireframe => "Wireframe",
        }
    }
}

/// Value of a settings field
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Flag(bool),
}

impl FieldValue {
    pub fn as_number(self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(n),
            FieldValue::Flag(_) => None,
        }
    }

    pub fn as_flag(self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(b),
            FieldValue::Number(_) => None,
        }
    }
}

impl Settings {
    /// Reads the current value of `field`
    pub fn get(&self, field: Field) -> FieldValue {
        let shape = &self.shape;
        let anim = &self.animation;
        match field {
            Field::MajorRadius => FieldValue::Number(shape.major_radius as f64),
            Field::MinorRadius => FieldValue::Number(shape.minor_radius as f64),
            Field::RadialSegments => FieldValue::Number(shape.radial_segments as f64),
            Field::TubularSegments => FieldValue::Number(shape.tubular_segments as f64),
            Field::RotationSpeed => FieldValue::Number(anim.rotation_speed as f64),
            Field::RotateX => FieldValue::Flag(anim.rotate_x),
            Field::RotateY => FieldValue::Flag(anim.rotate_y),
            Field::RotateZ => FieldValue::Flag(anim.rotate_z),
            Field::FlowAnimation => FieldValue::Flag(anim.flow_animation),
            Field::RainbowMode => FieldValue::Flag(anim.rainbow_mode),
            Field::Wireframe => FieldValue::Flag(anim.wireframe),
        }
    }

    /// Writes `value` into `field`. A value of the wrong kind is ignored.
    ///
    /// No range checks happen here; widgets clamp before writing.
    pub fn set(&mut self, field: Field, value: FieldValue) {
        match (field, value) {
            (Field::MajorRadius, FieldValue::Number(n)) => self.shape.major_radius = n as f32,
            (Field::MinorRadius, FieldValue::Number(n)) => self.shape.minor_radius = n as f32,
            (Field::RadialSegments, FieldValue::Number(n)) => {
                self.shape.radial_segments = n.round() as u32
            }
            (Field::TubularSegments, FieldValue::Number(n)) => {
                self.shape.tubular_segments = n.round() as u32
            }
            (Field::RotationSpeed, FieldValue::Number(n)) => {
                self.animation.rotation_speed = n as f32
            }
            (Field::RotateX, FieldValue::Flag(b)) => self.animation.rotate_x = b,
            (Field::RotateY, FieldValue::Flag(b)) => self.animation.rotate_y = b,
            (Field::RotateZ, FieldValue::Flag(b)) => self.animation.rotate_z = b,
            (Field::FlowAnimation, FieldValue::Flag(b)) => self.animation.flow_animation = b,
            (Field::RainbowMode, FieldValue::Flag(b)) => self.animation.rainbow_mode = b,
            (Field::Wireframe, FieldValue::Flag(b)) => self.animation.wireframe = b,
            (field, value) => {
                log::warn!("ignoring {:?} written to {:?}", value, field);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_what_set_wrote() {
        let mut settings = Settings::default();
        settings.set(Field::TubularSegments, FieldValue::Number(12.0));
        settings.set(Field::RainbowMode, FieldValue::Flag(true));
        assert_eq!(settings.get(Field::TubularSegments), FieldValue::Number(12.0));
        assert_eq!(settings.get(Field::RainbowMode), FieldValue::Flag(true));
    }

    #[test]
    fn mismatched_value_kind_is_ignored() {
        let mut settings = Settings::default();
        settings.set(Field::RotateZ, FieldValue::Number(1.0));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn only_geometry_fields_are_shape_fields() {
        assert!(Field::RadialSegments.is_shape());
        assert!(Field::MinorRadius.is_shape());
        assert!(!Field::RotationSpeed.is_shape());
        assert!(!Field::Wireframe.is_shape());
    }
}
