//! # Seed Data Generator
//!
//! Populates a database with a sample catalog for development.
//!
//! ## Usage
//! ```bash
//! # Generate 2,000 products (default)
//! cargo run -p catalog-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p catalog-db --bin seed -- --count 10000
//!
//! # Specify database path
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! ## Generated Data
//! - Unit codes: EA, CS, LB, OZ, GAL, DZ
//! - Products spread over three vendors, item codes `{CAT}-{NNNN}`
//! - Every tenth product is imported twice more, the way repeated vendor
//!   loads do it: the copies fill in the category and unit the first
//!   import left empty
//! - A global `products` search config with column labels

use chrono::Utc;
use std::collections::BTreeMap;
use std::env;

use catalog_core::{ConfigScope, SearchConfig, SearchConfigEntry};
use catalog_db::{Database, DbConfig, NewProduct};

const UNITS: &[&str] = &["EA", "CS", "LB", "OZ", "GAL", "DZ"];

const VENDORS: &[&str] = &["Sysco", "US Foods", "Performance Food"];

/// Category code, category name, product names
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "MEA",
        "Meat",
        &[
            "Angus Beef Patty",
            "Ground Beef 80/20",
            "Chicken Breast Boneless",
            "Pork Shoulder",
            "Bacon Sliced",
            "Turkey Breast Deli",
            "Beef Brisket",
            "Italian Sausage",
        ],
    ),
    (
        "DRY",
        "Dairy",
        &[
            "Whole Milk",
            "Cheddar Cheese Block",
            "Mozzarella Shredded",
            "Butter Unsalted",
            "Heavy Cream",
            "Greek Yogurt",
            "Sour Cream",
            "Eggs Large",
        ],
    ),
    (
        "BAK",
        "Bakery",
        &[
            "Apple Pie",
            "Apple Pieces Diced",
            "Hamburger Buns",
            "Sourdough Loaf",
            "Croissant",
            "Bagel Plain",
            "Tortilla Flour",
            "Pie Crust Shell",
        ],
    ),
    (
        "PRO",
        "Produce",
        &[
            "Romaine Hearts",
            "Tomato Roma",
            "Onion Yellow",
            "Potato Russet",
            "Lemon",
            "Avocado Hass",
            "Carrot Baby",
            "Garlic Peeled",
        ],
    ),
];

const SIZES: &[(&str, i64)] = &[
    ("", 0),
    ("Case", 2400),
    ("5 LB", 900),
    ("10 LB", 1700),
    ("Bulk", 3100),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 2000;
    let mut db_path = String::from("./catalog_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(2000);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of distinct products (default: 2000)");
                println!("  -d, --db <PATH>    Database file path (default: ./catalog_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Catalog Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count_active().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid mixing datasets.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut unit_ids = Vec::with_capacity(UNITS.len());
    for code in UNITS {
        unit_ids.push(db.uoms().insert(code).await?);
    }
    println!("✓ Inserted {} unit codes", unit_ids.len());

    db.search_configs()
        .insert(&SearchConfigEntry {
            table_name: "products".to_string(),
            scope: ConfigScope::Global,
            config: SearchConfig {
                display_columns: ["item_code", "description", "price_cents", "vendor", "category"]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
                search_columns: ["item_code", "description", "category"]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
                column_labels: BTreeMap::from([
                    ("item_code".to_string(), "Item #".to_string()),
                    ("price_cents".to_string(), "Price (cents)".to_string()),
                ]),
            },
            updated_at: Utc::now(),
        })
        .await?;
    println!("✓ Stored global products search config");

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut generated = 0;
    let mut rows = 0;

    'outer: for (cat_idx, (cat_code, cat_name, names)) in CATEGORIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            for (size_idx, (size, price_addon)) in SIZES.iter().enumerate() {
                for (vendor_idx, vendor) in VENDORS.iter().enumerate() {
                    if generated >= count {
                        break 'outer;
                    }

                    let seed = cat_idx * 1000 + name_idx * 50 + size_idx * 5 + vendor_idx;
                    let variants = generate_product(
                        cat_code,
                        cat_name,
                        name,
                        size,
                        *price_addon,
                        vendor,
                        &unit_ids,
                        seed,
                    );

                    for product in &variants {
                        if let Err(e) = db.products().insert(product).await {
                            eprintln!("Failed to insert {}: {}", product.item_code, e);
                            continue;
                        }
                        rows += 1;
                    }

                    generated += 1;
                    if generated % 500 == 0 {
                        println!("  Generated {} products...", generated);
                    }
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} products ({} rows) in {:?}",
        generated, rows, elapsed
    );

    let duplicates = db.products().find_duplicates().await?;
    println!("  Duplicate keys: {}", duplicates.len());
    println!("  Vendors: {}", db.products().list_vendors().await?.join(", "));

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one product, plus duplicate import rows for every tenth seed.
#[allow(clippy::too_many_arguments)]
fn generate_product(
    cat_code: &str,
    cat_name: &str,
    name: &str,
    size: &str,
    price_addon: i64,
    vendor: &str,
    unit_ids: &[i64],
    seed: usize,
) -> Vec<NewProduct> {
    let item_code = format!("{}-{:04}", cat_code, seed % 10_000);
    let description = if size.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, size)
    };

    // $1.99 - $9.98 + size addon
    let price_cents = 199 + ((seed * 37) % 800) as i64 + price_addon;
    let unit_id = unit_ids[seed % unit_ids.len()];

    let full = NewProduct::new(&item_code, &description, vendor)
        .price_cents(price_cents)
        .category(cat_name)
        .uom_id(unit_id);

    if seed % 10 != 0 {
        return vec![full];
    }

    // First import lacks category and unit; a later one supplies them
    vec![
        NewProduct::new(&item_code, &description, vendor).price_cents(price_cents),
        full,
        NewProduct::new(&item_code, &description, vendor),
    ]
}
