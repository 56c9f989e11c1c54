#![forbid(unsafe_code)]

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;
pub type Transform = euclid::Transform2D<f64, Unit, Unit>;
pub type Angle = euclid::Angle<f64>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

/// Rigid placement: rotate by `rotation` radians about the origin, then translate to `(x, y)`.
///
/// Equivalent to the SVG transform list `translate(x, y) rotate(deg)`.
pub fn placement(x: f64, y: f64, rotation: f64) -> Transform {
    Transform::rotation(Angle::radians(rotation)).then_translate(vector(x, y))
}
