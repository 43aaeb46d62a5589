//! SQL schema for the restaurant catalog.
//!
//! `name` carries a UNIQUE constraint so that `INSERT OR REPLACE` acts as an
//! upsert keyed on the establishment name, while `id` stays the physical key.

pub const RESTAURANTS_DB_NAME: &str = "restaurants.db";

pub const RESTAURANTS_DB_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS restaurants (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        rating REAL,
        reviews INTEGER,
        address TEXT,
        phone TEXT,
        hours TEXT,
        price_range TEXT,
        location TEXT,
        menu TEXT,
        last_updated DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_restaurants_location ON restaurants(location);
    CREATE INDEX IF NOT EXISTS idx_restaurants_menu ON restaurants(menu);
";

pub const UPSERT_RESTAURANT: &str = "
    INSERT OR REPLACE INTO restaurants
        (name, rating, reviews, address, phone, hours, price_range, location, menu)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
";
