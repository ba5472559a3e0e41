//! Initial schema: admins, taxonomy terms, products, blogs and contact queries.
//!
//! Product and taxonomy references are plain UUID columns with no foreign
//! keys, and names carry no unique constraint. Duplicate detection happens
//! in the service layer; the `lower(...)` indexes keep those lookups cheap.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(SCHEMA_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
DROP TABLE IF EXISTS contact_queries CASCADE;
DROP TABLE IF EXISTS blogs CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS taxonomy_terms CASCADE;
DROP TABLE IF EXISTS admins CASCADE;
DROP TYPE IF EXISTS term_kind;
",
        )
        .await?;
        Ok(())
    }
}

const SCHEMA_SQL: &str = r"
CREATE EXTENSION IF NOT EXISTS pgcrypto;

-- ============================================================
-- ADMINS
-- ============================================================
CREATE TABLE admins (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    avatar TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- ============================================================
-- TAXONOMY (categories, materials, sizes)
-- ============================================================
CREATE TYPE term_kind AS ENUM ('category', 'material', 'size');

CREATE TABLE taxonomy_terms (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    kind term_kind NOT NULL,
    name TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_taxonomy_terms_kind_name ON taxonomy_terms(kind, lower(name));
CREATE INDEX idx_taxonomy_terms_kind_created ON taxonomy_terms(kind, created_at DESC);

-- ============================================================
-- PRODUCTS
-- ============================================================
CREATE TABLE products (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL,
    category_id UUID NOT NULL,
    material_id UUID NOT NULL,
    size TEXT,
    quantity_per_pack INTEGER NOT NULL DEFAULT 1,
    price_per_pack NUMERIC(12, 2),
    images JSONB NOT NULL DEFAULT '[]'::jsonb,
    description TEXT,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_quantity_positive CHECK (quantity_per_pack > 0),
    CONSTRAINT chk_price_non_negative CHECK (price_per_pack IS NULL OR price_per_pack >= 0)
);

CREATE INDEX idx_products_identity ON products(category_id, material_id, lower(name));
CREATE INDEX idx_products_created ON products(created_at DESC);

-- ============================================================
-- BLOGS
-- ============================================================
CREATE TABLE blogs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    images JSONB NOT NULL DEFAULT '[]'::jsonb,
    content JSONB NOT NULL DEFAULT '[]'::jsonb,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_blogs_created ON blogs(created_at DESC);

-- ============================================================
-- CONTACT QUERIES
-- ============================================================
CREATE TABLE contact_queries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL DEFAULT '',
    phone VARCHAR(32),
    message TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_contact_queries_created ON contact_queries(created_at DESC);
";
