//! Fixed cuisine vocabulary used to annotate keyword filters.
//!
//! # Examples
//! ```
//! use roadside_core::Cuisine;
//!
//! assert_eq!(Cuisine::FastFood.as_str(), "fast food");
//! assert_eq!("BBQ".parse::<Cuisine>(), Ok(Cuisine::Bbq));
//! ```

/// A cuisine or category keyword offered as a quick filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cuisine {
    /// Pizza places.
    Pizza,
    /// Burger joints.
    Burger,
    /// Mexican food.
    Mexican,
    /// Chinese food.
    Chinese,
    /// Japanese food.
    Japanese,
    /// Sushi bars.
    Sushi,
    /// Thai food.
    Thai,
    /// Indian food.
    Indian,
    /// Italian food.
    Italian,
    /// Barbecue.
    Bbq,
    /// Seafood.
    Seafood,
    /// Vegetarian-friendly places.
    Vegetarian,
    /// Cafes and coffee shops.
    Cafe,
    /// Bakeries.
    Bakery,
    /// Breakfast spots.
    Breakfast,
    /// Steakhouses.
    Steakhouse,
    /// Fast food.
    FastFood,
}

impl Cuisine {
    /// Every cuisine in display order.
    pub const ALL: [Self; 17] = [
        Self::Pizza,
        Self::Burger,
        Self::Mexican,
        Self::Chinese,
        Self::Japanese,
        Self::Sushi,
        Self::Thai,
        Self::Indian,
        Self::Italian,
        Self::Bbq,
        Self::Seafood,
        Self::Vegetarian,
        Self::Cafe,
        Self::Bakery,
        Self::Breakfast,
        Self::Steakhouse,
        Self::FastFood,
    ];

    /// The keyword matched against names and categories.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pizza => "pizza",
            Self::Burger => "burger",
            Self::Mexican => "mexican",
            Self::Chinese => "chinese",
            Self::Japanese => "japanese",
            Self::Sushi => "sushi",
            Self::Thai => "thai",
            Self::Indian => "indian",
            Self::Italian => "italian",
            Self::Bbq => "bbq",
            Self::Seafood => "seafood",
            Self::Vegetarian => "vegetarian",
            Self::Cafe => "cafe",
            Self::Bakery => "bakery",
            Self::Breakfast => "breakfast",
            Self::Steakhouse => "steakhouse",
            Self::FastFood => "fast food",
        }
    }
}

impl std::fmt::Display for Cuisine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Cuisine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('_', " ");
        Self::ALL
            .into_iter()
            .find(|cuisine| cuisine.as_str() == needle)
            .ok_or_else(|| format!("unknown cuisine '{s}'"))
    }
}
