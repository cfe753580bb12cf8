//! Database seeder for Kasira development and testing.
//!
//! Seeds the chart of accounts the posting engine resolves at startup
//! plus a couple of demo product units.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use kasira_db::entities::{
    account_categories, account_subcategories, accounts, product_units,
    sea_orm_active_enums::NormalBalance,
};

/// One account category with its normal balance.
struct CategorySpec {
    id: &'static str,
    name: &'static str,
    normal_balance: NormalBalance,
}

/// One subcategory under a category.
struct SubcategorySpec {
    id: &'static str,
    category_id: &'static str,
    name: &'static str,
}

/// One account under a subcategory.
struct AccountSpec {
    subcategory_id: &'static str,
    code: &'static str,
    name: &'static str,
    is_system: bool,
}

const CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        id: "00000000-0000-0000-0000-0000000000a1",
        name: "Assets",
        normal_balance: NormalBalance::DebitIncreasing,
    },
    CategorySpec {
        id: "00000000-0000-0000-0000-0000000000a2",
        name: "Liabilities",
        normal_balance: NormalBalance::CreditIncreasing,
    },
    CategorySpec {
        id: "00000000-0000-0000-0000-0000000000a3",
        name: "Equity",
        normal_balance: NormalBalance::CreditIncreasing,
    },
    CategorySpec {
        id: "00000000-0000-0000-0000-0000000000a4",
        name: "Revenue",
        normal_balance: NormalBalance::CreditIncreasing,
    },
    CategorySpec {
        id: "00000000-0000-0000-0000-0000000000a5",
        name: "Expenses",
        normal_balance: NormalBalance::DebitIncreasing,
    },
];

const SUBCATEGORIES: &[SubcategorySpec] = &[
    SubcategorySpec {
        id: "00000000-0000-0000-0000-0000000000b1",
        category_id: "00000000-0000-0000-0000-0000000000a1",
        name: "Current Assets",
    },
    SubcategorySpec {
        id: "00000000-0000-0000-0000-0000000000b2",
        category_id: "00000000-0000-0000-0000-0000000000a2",
        name: "Current Liabilities",
    },
    SubcategorySpec {
        id: "00000000-0000-0000-0000-0000000000b3",
        category_id: "00000000-0000-0000-0000-0000000000a3",
        name: "Owner's Equity",
    },
    SubcategorySpec {
        id: "00000000-0000-0000-0000-0000000000b4",
        category_id: "00000000-0000-0000-0000-0000000000a4",
        name: "Operating Revenue",
    },
    SubcategorySpec {
        id: "00000000-0000-0000-0000-0000000000b5",
        category_id: "00000000-0000-0000-0000-0000000000a5",
        name: "Cost of Sales",
    },
];

const ACCOUNTS: &[AccountSpec] = &[
    AccountSpec {
        subcategory_id: "00000000-0000-0000-0000-0000000000b1",
        code: "1000",
        name: "Cash",
        is_system: false,
    },
    AccountSpec {
        subcategory_id: "00000000-0000-0000-0000-0000000000b1",
        code: "1100",
        name: "Accounts Receivable",
        is_system: true,
    },
    AccountSpec {
        subcategory_id: "00000000-0000-0000-0000-0000000000b1",
        code: "1200",
        name: "Inventory",
        is_system: true,
    },
    AccountSpec {
        subcategory_id: "00000000-0000-0000-0000-0000000000b2",
        code: "2000",
        name: "Accounts Payable",
        is_system: true,
    },
    AccountSpec {
        subcategory_id: "00000000-0000-0000-0000-0000000000b3",
        code: "3000",
        name: "Owner's Capital",
        is_system: false,
    },
    AccountSpec {
        subcategory_id: "00000000-0000-0000-0000-0000000000b4",
        code: "4000",
        name: "Sales Revenue",
        is_system: true,
    },
    AccountSpec {
        subcategory_id: "00000000-0000-0000-0000-0000000000b5",
        code: "5000",
        name: "Cost of Goods Sold",
        is_system: true,
    },
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = kasira_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding account categories...");
    seed_categories(&db).await;

    println!("Seeding account subcategories...");
    seed_subcategories(&db).await;

    println!("Seeding accounts...");
    seed_accounts(&db).await;

    println!("Seeding demo product units...");
    seed_product_units(&db).await;

    println!("Seeding complete!");
}

fn fixed_id(id: &str) -> Uuid {
    Uuid::parse_str(id).unwrap()
}

async fn seed_categories(db: &DatabaseConnection) {
    for spec in CATEGORIES {
        if account_categories::Entity::find_by_id(fixed_id(spec.id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Category {} already exists, skipping...", spec.name);
            continue;
        }

        let now = Utc::now();
        let row = account_categories::ActiveModel {
            id: Set(fixed_id(spec.id)),
            name: Set(spec.name.to_string()),
            normal_balance: Set(spec.normal_balance),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        if let Err(e) = row.insert(db).await {
            eprintln!("Failed to insert category {}: {e}", spec.name);
        } else {
            println!("  Created category: {}", spec.name);
        }
    }
}

async fn seed_subcategories(db: &DatabaseConnection) {
    for spec in SUBCATEGORIES {
        if account_subcategories::Entity::find_by_id(fixed_id(spec.id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Subcategory {} already exists, skipping...", spec.name);
            continue;
        }

        let now = Utc::now();
        let row = account_subcategories::ActiveModel {
            id: Set(fixed_id(spec.id)),
            category_id: Set(fixed_id(spec.category_id)),
            name: Set(spec.name.to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        if let Err(e) = row.insert(db).await {
            eprintln!("Failed to insert subcategory {}: {e}", spec.name);
        } else {
            println!("  Created subcategory: {}", spec.name);
        }
    }
}

async fn seed_accounts(db: &DatabaseConnection) {
    for spec in ACCOUNTS {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(spec.code))
            .one(db)
            .await
            .ok()
            .flatten();
        if existing.is_some() {
            println!("  Account {} already exists, skipping...", spec.code);
            continue;
        }

        let now = Utc::now();
        let row = accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            subcategory_id: Set(fixed_id(spec.subcategory_id)),
            code: Set(spec.code.to_string()),
            name: Set(spec.name.to_string()),
            is_active: Set(true),
            is_system: Set(spec.is_system),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        if let Err(e) = row.insert(db).await {
            eprintln!("Failed to insert account {}: {e}", spec.code);
        } else {
            println!("  Created account: {} {}", spec.code, spec.name);
        }
    }
}

async fn seed_product_units(db: &DatabaseConnection) {
    let units = [
        ("00000000-0000-0000-0000-0000000000c1", "Still Water", "bottle", "1", "5.00"),
        ("00000000-0000-0000-0000-0000000000c2", "Still Water", "crate of 12", "12", "54.00"),
    ];

    for (id, name, label, factor, price) in units {
        if product_units::Entity::find_by_id(fixed_id(id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Product unit {name} ({label}) already exists, skipping...");
            continue;
        }

        let now = Utc::now();
        let row = product_units::ActiveModel {
            id: Set(fixed_id(id)),
            name: Set(name.to_string()),
            unit_label: Set(label.to_string()),
            conversion_factor: Set(factor.parse::<Decimal>().unwrap()),
            sale_price: Set(price.parse::<Decimal>().unwrap()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        if let Err(e) = row.insert(db).await {
            eprintln!("Failed to insert product unit {name} ({label}): {e}");
        } else {
            println!("  Created product unit: {name} ({label})");
        }
    }
}
