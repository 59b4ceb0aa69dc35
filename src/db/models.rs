use serde::{Deserialize, Serialize};

/// Clothing type enumeration, declared once and shared by every layer.
/// Stored in SQLite as its uppercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClothingType {
    Shirt,
    Pants,
    Jacket,
    Jumper,
    Shoes,
    Hoodie,
}

impl ClothingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClothingType::Shirt => "SHIRT",
            ClothingType::Pants => "PANTS",
            ClothingType::Jacket => "JACKET",
            ClothingType::Jumper => "JUMPER",
            ClothingType::Shoes => "SHOES",
            ClothingType::Hoodie => "HOODIE",
        }
    }

    /// Canonical capitalization used as the wardrobe grouping key.
    pub fn display_name(&self) -> &'static str {
        match self {
            ClothingType::Shirt => "Shirt",
            ClothingType::Pants => "Pants",
            ClothingType::Jacket => "Jacket",
            ClothingType::Jumper => "Jumper",
            ClothingType::Shoes => "Shoes",
            ClothingType::Hoodie => "Hoodie",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SHIRT" => Some(ClothingType::Shirt),
            "PANTS" => Some(ClothingType::Pants),
            "JACKET" => Some(ClothingType::Jacket),
            "JUMPER" => Some(ClothingType::Jumper),
            "SHOES" => Some(ClothingType::Shoes),
            "HOODIE" => Some(ClothingType::Hoodie),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    Red,
    Blue,
    Brown,
    Pink,
    Grey,
    Beige,
    Green,
    Black,
    White,
    Yellow,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Blue => "BLUE",
            Color::Brown => "BROWN",
            Color::Pink => "PINK",
            Color::Grey => "GREY",
            Color::Beige => "BEIGE",
            Color::Green => "GREEN",
            Color::Black => "BLACK",
            Color::White => "WHITE",
            Color::Yellow => "YELLOW",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "RED" => Some(Color::Red),
            "BLUE" => Some(Color::Blue),
            "BROWN" => Some(Color::Brown),
            "PINK" => Some(Color::Pink),
            "GREY" => Some(Color::Grey),
            "BEIGE" => Some(Color::Beige),
            "GREEN" => Some(Color::Green),
            "BLACK" => Some(Color::Black),
            "WHITE" => Some(Color::White),
            "YELLOW" => Some(Color::Yellow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Occasion {
    Casual,
    Work,
    Sport,
    Formal,
}

impl Occasion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Casual => "CASUAL",
            Occasion::Work => "WORK",
            Occasion::Sport => "SPORT",
            Occasion::Formal => "FORMAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CASUAL" => Some(Occasion::Casual),
            "WORK" => Some(Occasion::Work),
            "SPORT" => Some(Occasion::Sport),
            "FORMAL" => Some(Occasion::Formal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub external_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ClothingType,
    pub name: Option<String>,
    pub color: Option<Color>,
    pub picture: Option<String>,
    pub description: Option<String>,
    pub times_worn: i64,
    pub last_worn: Option<String>,
    pub is_favorite: bool,
    pub is_available: bool,
    pub is_deleted: bool,
}

/// Item fields as embedded in outfit and neighbor listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ClothingType,
    pub name: Option<String>,
    pub color: Option<Color>,
    pub picture: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outfit {
    pub id: i64,
    pub occasion: Occasion,
    pub picture: String,
    pub preview: Vec<String>,
    pub times_worn: i64,
    pub last_worn: Option<String>,
    pub is_used: bool,
    pub is_worn: bool,
    pub items: Vec<ItemSummary>,
}
