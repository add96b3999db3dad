use serde::{Deserialize, Serialize};

use crate::core::error::ValidationError;

/// Color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    red: f32,
    green: f32,
    blue: f32,
    #[serde(default = "opaque")]
    alpha: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub fn rgb(red: f32, green: f32, blue: f32) -> Result<Self, ValidationError> {
        Self::rgba(red, green, blue, 1.0)
    }

    pub fn rgba(red: f32, green: f32, blue: f32, alpha: f32) -> Result<Self, ValidationError> {
        for (field, v) in [("red", red), ("green", green), ("blue", blue), ("alpha", alpha)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ValidationError::out_of_range(
                    field,
                    format!("{v} not in [0, 1]"),
                ));
            }
        }
        Ok(Self {
            red,
            green,
            blue,
            alpha,
        })
    }

    pub fn components(&self) -> (f32, f32, f32, f32) {
        (self.red, self.green, self.blue, self.alpha)
    }

    /// Re-checks a color that did not come through [`Color::rgba`] (wire input).
    pub(crate) fn check(&self) -> Result<(), ValidationError> {
        Self::rgba(self.red, self.green, self.blue, self.alpha).map(|_| ())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KnownIcon {
    Airplane,
    Bookmark,
    Bus,
    Car,
    Clock,
    ConfirmationNumberIcon,
    Description,
    Dollar,
    Email,
    EventSeat,
    FlightArrival,
    FlightDeparture,
    Hotel,
    HotelRoomType,
    Invite,
    MapPin,
    Membership,
    MultiplePeople,
    Person,
    Phone,
    RestaurantIcon,
    ShoppingCart,
    Star,
    Store,
    Ticket,
    Train,
    VideoCamera,
    VideoPlay,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IconSource {
    KnownIcon(KnownIcon),
    IconUrl(String),
    MaterialIcon(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    pub source: IconSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub image_type: ImageType,
}

impl Icon {
    pub fn known(icon: KnownIcon) -> Self {
        Self {
            source: IconSource::KnownIcon(icon),
            alt_text: None,
            image_type: ImageType::Square,
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            source: IconSource::IconUrl(url.into()),
            alt_text: None,
            image_type: ImageType::Square,
        }
    }

    pub fn material(name: impl Into<String>) -> Self {
        Self {
            source: IconSource::MaterialIcon(name.into()),
            alt_text: None,
            image_type: ImageType::Square,
        }
    }

    pub fn alt_text(mut self, alt: impl Into<String>) -> Self {
        self.alt_text = Some(alt.into());
        self
    }

    pub fn image_type(mut self, image_type: ImageType) -> Self {
        self.image_type = image_type;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageType {
    #[default]
    Square,
    Circle,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BorderType {
    #[default]
    NoBorder,
    Stroke,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderStyle {
    #[serde(rename = "type")]
    border_type: BorderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stroke_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    corner_radius: Option<u32>,
}

impl BorderStyle {
    pub fn new(border_type: BorderType) -> Self {
        Self {
            border_type,
            stroke_color: None,
            corner_radius: None,
        }
    }

    pub fn stroke_color(mut self, color: Color) -> Self {
        self.stroke_color = Some(color);
        self
    }

    pub fn corner_radius(mut self, radius: u32) -> Result<Self, ValidationError> {
        if radius == 0 {
            return Err(ValidationError::out_of_range(
                "cornerRadius",
                "corner radius must be positive",
            ));
        }
        self.corner_radius = Some(radius);
        Ok(self)
    }

    pub fn border_type(&self) -> BorderType {
        self.border_type
    }

    pub fn radius(&self) -> Option<u32> {
        self.corner_radius
    }

    pub(crate) fn check(&self) -> Result<(), ValidationError> {
        if self.corner_radius == Some(0) {
            return Err(ValidationError::out_of_range(
                "cornerRadius",
                "corner radius must be positive",
            ));
        }
        match &self.stroke_color {
            Some(c) => c.check(),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageCropType {
    #[default]
    Square,
    Circle,
    RectangleCustom,
    #[serde(rename = "RECTANGLE_4_3")]
    Rectangle4_3,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCropStyle {
    #[serde(rename = "type")]
    crop_type: ImageCropType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<f64>,
}

impl ImageCropStyle {
    pub fn new(crop_type: ImageCropType) -> Self {
        Self {
            crop_type,
            aspect_ratio: None,
        }
    }

    /// Only meaningful for `RECTANGLE_CUSTOM`; the ratio is width over height.
    pub fn aspect_ratio(mut self, ratio: f64) -> Result<Self, ValidationError> {
        if !(ratio > 0.0) || !ratio.is_finite() {
            return Err(ValidationError::out_of_range(
                "aspectRatio",
                format!("{ratio} must be a positive number"),
            ));
        }
        self.aspect_ratio = Some(ratio);
        Ok(self)
    }

    pub fn crop_type(&self) -> ImageCropType {
        self.crop_type
    }

    pub fn ratio(&self) -> Option<f64> {
        self.aspect_ratio
    }

    pub(crate) fn check(&self) -> Result<(), ValidationError> {
        match self.aspect_ratio {
            Some(r) => Self::new(self.crop_type).aspect_ratio(r).map(|_| ()),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HorizontalAlignment {
    #[default]
    Start,
    Center,
    End,
    #[serde(other)]
    Unspecified,
}
