//! Database seeder for Packline development and testing.
//!
//! Seeds an admin account, starter categories, materials and sizes, and a
//! few products. Safe to run repeatedly: existing records are skipped.
//!
//! Usage: cargo run --bin seeder
//!
//! `SEED_ADMIN_EMAIL` and `SEED_ADMIN_PASSWORD` override the admin login.

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use packline_core::account::{AdminStore, NewAdmin};
use packline_core::auth::hash_password;
use packline_core::catalog::{
    CatalogError, CatalogService, CatalogStore, ProductDraft, TaxonomyKind, TermDraft, TermKey,
};
use packline_db::{AdminRepository, ProductRepository, TermRepository};

const DEFAULT_ADMIN_EMAIL: &str = "admin@packline.dev";
const DEFAULT_ADMIN_PASSWORD: &str = "packline-admin";

const CATEGORIES: &[&str] = &["Mailer Boxes", "Shipping Boxes", "Gift Boxes"];
const MATERIALS: &[&str] = &["Kraft", "Corrugated", "Rigid Board"];
const SIZES: &[&str] = &["Small", "Medium", "Large"];

/// (name, category, material, size, quantity per pack, price in cents)
const PRODUCTS: &[(&str, &str, &str, &str, i32, i64)] = &[
    ("Kraft Mailer", "Mailer Boxes", "Kraft", "Small", 50, 2_499),
    ("Double Wall Carton", "Shipping Boxes", "Corrugated", "Large", 20, 3_150),
    ("Magnetic Gift Box", "Gift Boxes", "Rigid Board", "Medium", 10, 4_800),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("PACKLINE__DATABASE__URL"))
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set in environment"))?;

    println!("Connecting to database...");
    let db = packline_db::connect(&database_url).await?;

    println!("Seeding admin...");
    seed_admin(&db).await?;

    println!("Seeding taxonomy...");
    seed_terms(&db, TaxonomyKind::Category, CATEGORIES).await?;
    seed_terms(&db, TaxonomyKind::Material, MATERIALS).await?;
    seed_terms(&db, TaxonomyKind::Size, SIZES).await?;

    println!("Seeding products...");
    seed_products(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_admin(db: &DatabaseConnection) -> anyhow::Result<()> {
    let email = std::env::var("SEED_ADMIN_EMAIL")
        .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string())
        .to_lowercase();
    let password =
        std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());

    let admins = AdminRepository::new(db.clone());
    if admins.find_by_email(&email).await?.is_some() {
        println!("  Admin {email} already exists, skipping...");
        return Ok(());
    }

    admins
        .insert(NewAdmin {
            name: "Packline Admin".to_string(),
            email: email.clone(),
            avatar: None,
            password_hash: hash_password(&password)?,
        })
        .await?;
    println!("  Created admin {email}");
    Ok(())
}

async fn seed_terms(
    db: &DatabaseConnection,
    kind: TaxonomyKind,
    names: &[&str],
) -> anyhow::Result<()> {
    let terms = CatalogService::new(TermRepository::new(db.clone(), kind));
    for name in names {
        let draft = TermDraft {
            name: (*name).to_string(),
            is_active: true,
        };
        match terms.create(draft).await {
            Ok(_) => println!("  Created {} {name}", kind.label()),
            Err(CatalogError::Duplicate { .. }) => {
                println!("  {} {name} already exists, skipping...", kind.label());
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

async fn term_id(db: &DatabaseConnection, kind: TaxonomyKind, name: &str) -> anyhow::Result<Uuid> {
    let repo = TermRepository::new(db.clone(), kind);
    repo.find_duplicate(&TermKey(name.to_string()), None)
        .await?
        .map(|term| term.id)
        .ok_or_else(|| anyhow::anyhow!("{} {name} is missing", kind.label()))
}

async fn seed_products(db: &DatabaseConnection) -> anyhow::Result<()> {
    let products = CatalogService::new(ProductRepository::new(db.clone()));
    for &(name, category, material, size, quantity, cents) in PRODUCTS {
        let draft = ProductDraft {
            name: name.to_string(),
            category_id: term_id(db, TaxonomyKind::Category, category).await?,
            material_id: term_id(db, TaxonomyKind::Material, material).await?,
            size: Some(size.to_string()),
            quantity_per_pack: quantity,
            price_per_pack: Some(Decimal::new(cents, 2)),
            images: Vec::new(),
            description: None,
            is_active: true,
        };
        match products.create(draft).await {
            Ok(_) => println!("  Created product {name}"),
            Err(CatalogError::Duplicate { .. }) => {
                println!("  Product {name} already exists, skipping...");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
