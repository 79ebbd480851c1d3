use serde::{Deserialize, Serialize};

/// Fixed set of expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Household,
    Shopping,
    Health,
    Travel,
    Education,
    Pets,
    Gifts,
    FoodDrink,
    Other,
}

/// Display attributes of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub icon: &'static str,
    pub color: &'static str,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Household,
        Category::Shopping,
        Category::Health,
        Category::Travel,
        Category::Education,
        Category::Pets,
        Category::Gifts,
        Category::FoodDrink,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Household => "household",
            Category::Shopping => "shopping",
            Category::Health => "health",
            Category::Travel => "travel",
            Category::Education => "education",
            Category::Pets => "pets",
            Category::Gifts => "gifts",
            Category::FoodDrink => "food_drink",
            Category::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Resolve a stored category string for display. Unknown values map to
    /// `Other`; the stored string itself is never rewritten.
    pub fn resolve(raw: &str) -> Self {
        Self::from_str(raw).unwrap_or(Category::Other)
    }

    pub fn info(&self) -> CategoryInfo {
        let (icon, color) = match self {
            Category::Household => ("🏠", "#fdcb6e"),
            Category::Shopping => ("👗", "#a29bfe"),
            Category::Health => ("🏥", "#00b894"),
            Category::Travel => ("✈️", "#0984e3"),
            Category::Education => ("📚", "#6c5ce7"),
            Category::Pets => ("🐾", "#e84393"),
            Category::Gifts => ("🎁", "#fd79a8"),
            Category::FoodDrink => ("🍔", "#ff7675"),
            Category::Other => ("📦", "#b2bec3"),
        };
        CategoryInfo { icon, color }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Total lookup from a raw stored category to its icon and color.
pub fn category_info(raw: &str) -> CategoryInfo {
    Category::resolve(raw).info()
}

/// Human label for a raw category: first letter upper-cased, underscores
/// turned into spaces. Example: "food_drink" -> "Food drink".
pub fn category_label(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => {
            let rest: String = chars.collect();
            format!("{}{}", first.to_uppercase(), rest.replace('_', " "))
        }
        None => String::new(),
    }
}
