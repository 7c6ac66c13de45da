//! Fixed vocabularies for vendor and menu generation.

pub const LAGOS_AREAS: &[&str] = &[
    "Ikeja",
    "Lekki",
    "Yaba",
    "Victoria Island",
    "Surulere",
    "Maryland",
];

pub const VENDOR_SUFFIXES: &[&str] = &["Kitchen", "Grills", "Bistro", "Foods", "Lounge", "Place"];

pub const LAGOS_SIDES: &[&str] = &["Island", "Mainland"];

/// Menu category tag paired with the dishes it offers.
pub const MENU_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "SWALLOW",
        &[
            "Pounded Yam & Egusi",
            "Amala & Ewedu",
            "Eba & Okro",
            "Semovita & Ogbono",
        ],
    ),
    (
        "RICE",
        &["Jollof Rice", "Fried Rice", "Coconut Rice", "Ofada Rice"],
    ),
    (
        "GRILLS",
        &["Suya Platter", "Grilled Fish", "Peppered Chicken", "Asun"],
    ),
    ("SOUPS", &["Pepper Soup", "Goat Meat Pepper Soup"]),
    ("DRINKS", &["Chapman", "Zobo", "Fresh Juice", "Soda"]),
];

pub const DISH_MODIFIERS: &[&str] = &["Spicy", "Special", "Hot"];

pub const PREP_TIMES_MINUTES: &[i32] = &[15, 20, 30, 45];

pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/400x300?text=Food";

pub const PLACEHOLDER_PASSWORD: &str = "hashed_password_placeholder";

pub const RICE_CUSTOMIZATION: &str = "Spicy, Extra Plantain";

pub const MENU_PRICE_RANGE: (f64, f64) = (2500.0, 8000.0);
