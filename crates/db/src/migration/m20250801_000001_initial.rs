//! Initial database migration.
//!
//! Creates all enums, tables, indexes, and triggers, and seeds the
//! GHG Protocol categories and the system factor catalog.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: REGISTRY TABLES
        // ============================================================
        db.execute_unprepared(ORGANIZATIONS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: FACTOR CATALOG
        // ============================================================
        db.execute_unprepared(CATEGORIES_SQL).await?;
        db.execute_unprepared(EMISSION_SOURCES_SQL).await?;
        db.execute_unprepared(FACTOR_HISTORY_SQL).await?;

        // ============================================================
        // PART 4: EMISSIONS LEDGER
        // ============================================================
        db.execute_unprepared(EMISSION_ENTRIES_SQL).await?;

        // ============================================================
        // PART 5: REDUCTION TRACKER
        // ============================================================
        db.execute_unprepared(REDUCTION_GOALS_SQL).await?;
        db.execute_unprepared(INITIATIVES_SQL).await?;
        db.execute_unprepared(INITIATIVE_PROGRESS_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 7: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_CATEGORIES_SQL).await?;
        db.execute_unprepared(SEED_SOURCES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Organization moderation status
CREATE TYPE org_status AS ENUM ('pending', 'verified', 'rejected');

-- User roles
CREATE TYPE user_role AS ENUM ('admin', 'manager', 'normal_user');

-- Emission entry verification state
CREATE TYPE verification_status AS ENUM ('unverified', 'verified', 'rejected');

-- Shared catalog vs organization-owned source
CREATE TYPE source_kind AS ENUM ('system', 'custom');

-- Reduction goal status
CREATE TYPE goal_status AS ENUM ('active', 'in_progress', 'achieved', 'abandoned');

-- Reduction initiative status
CREATE TYPE initiative_status AS ENUM ('planned', 'in_progress', 'completed', 'cancelled');
";

const ORGANIZATIONS_SQL: &str = r"
CREATE TABLE organizations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    code VARCHAR(16) NOT NULL UNIQUE,
    industry VARCHAR(100),
    status org_status NOT NULL DEFAULT 'pending',
    baseline_year INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_organizations_status ON organizations(status);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    -- NULL only for org-less admins.
    organization_id UUID REFERENCES organizations(id) ON DELETE CASCADE,
    email VARCHAR(255) NOT NULL UNIQUE,
    display_name VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'normal_user',
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_users_organization ON users(organization_id);
";

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    scope_number SMALLINT NOT NULL CHECK (scope_number IN (1, 2, 3)),
    code VARCHAR(40) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_categories_scope ON categories(scope_number);
";

const EMISSION_SOURCES_SQL: &str = r"
CREATE TABLE emission_sources (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    category_id UUID NOT NULL REFERENCES categories(id),
    code VARCHAR(40) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    factor_value NUMERIC(18, 8) NOT NULL CHECK (factor_value > 0),
    unit VARCHAR(40) NOT NULL,
    description TEXT,
    region VARCHAR(100),
    reference_year INTEGER,
    kind source_kind NOT NULL DEFAULT 'system',
    organization_id UUID REFERENCES organizations(id) ON DELETE CASCADE,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- Custom sources must name an owner; system sources must not.
    CONSTRAINT chk_source_ownership CHECK (
        (kind = 'system' AND organization_id IS NULL)
        OR (kind = 'custom' AND organization_id IS NOT NULL)
    )
);

CREATE INDEX idx_sources_category ON emission_sources(category_id);
CREATE INDEX idx_sources_organization ON emission_sources(organization_id);
";

const FACTOR_HISTORY_SQL: &str = r"
CREATE TABLE factor_history (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    source_id UUID NOT NULL REFERENCES emission_sources(id) ON DELETE CASCADE,
    old_value NUMERIC(18, 8) NOT NULL,
    new_value NUMERIC(18, 8) NOT NULL,
    reason TEXT NOT NULL,
    changed_by UUID NOT NULL REFERENCES users(id),
    changed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_factor_history_source ON factor_history(source_id, changed_at DESC);
";

const EMISSION_ENTRIES_SQL: &str = r"
CREATE TABLE emission_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    source_id UUID NOT NULL REFERENCES emission_sources(id),
    quantity NUMERIC(18, 6) NOT NULL CHECK (quantity > 0),
    unit VARCHAR(40) NOT NULL,
    factor_value_at_entry NUMERIC(18, 8) NOT NULL,
    co2e NUMERIC(24, 8) NOT NULL,
    reporting_period VARCHAR(20) NOT NULL,
    verification_status verification_status NOT NULL DEFAULT 'unverified',
    entered_by UUID NOT NULL REFERENCES users(id),
    verified_by UUID REFERENCES users(id),
    verified_at TIMESTAMPTZ,
    rejection_note TEXT,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- A rejection always carries its note.
    CONSTRAINT chk_rejection_note CHECK (
        verification_status != 'rejected' OR rejection_note IS NOT NULL
    )
);

CREATE INDEX idx_entries_org_status ON emission_entries(organization_id, verification_status);
CREATE INDEX idx_entries_org_period ON emission_entries(organization_id, reporting_period);
CREATE INDEX idx_entries_source ON emission_entries(source_id);
";

const REDUCTION_GOALS_SQL: &str = r"
CREATE TABLE reduction_goals (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    baseline_year INTEGER NOT NULL,
    baseline_emissions_total NUMERIC(24, 8) NOT NULL,
    target_year INTEGER NOT NULL,
    target_reduction_percentage NUMERIC(5, 2) NOT NULL
        CHECK (target_reduction_percentage > 0 AND target_reduction_percentage <= 100),
    status goal_status NOT NULL DEFAULT 'active',
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_goal_years CHECK (target_year > baseline_year)
);

CREATE INDEX idx_goals_organization ON reduction_goals(organization_id);
";

const INITIATIVES_SQL: &str = r"
CREATE TABLE initiatives (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    goal_id UUID NOT NULL REFERENCES reduction_goals(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    category VARCHAR(100),
    description TEXT,
    status initiative_status NOT NULL DEFAULT 'planned',
    estimated_reduction NUMERIC(24, 8),
    actual_reduction NUMERIC(24, 8),
    planned_completion DATE,
    actual_completion DATE,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_initiatives_goal ON initiatives(goal_id);
";

const INITIATIVE_PROGRESS_SQL: &str = r"
CREATE TABLE initiative_progress (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    initiative_id UUID NOT NULL REFERENCES initiatives(id) ON DELETE CASCADE,
    progress_percentage NUMERIC(5, 2) NOT NULL
        CHECK (progress_percentage >= 0 AND progress_percentage <= 100),
    status_label VARCHAR(100),
    note TEXT,
    recorded_by UUID NOT NULL REFERENCES users(id),
    recorded_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_progress_initiative ON initiative_progress(initiative_id, recorded_at);
";

const TRIGGERS_SQL: &str = r"
-- Keep updated_at current on every row update.
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_organizations_updated_at
    BEFORE UPDATE ON organizations
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_users_updated_at
    BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_emission_sources_updated_at
    BEFORE UPDATE ON emission_sources
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_emission_entries_updated_at
    BEFORE UPDATE ON emission_entries
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_reduction_goals_updated_at
    BEFORE UPDATE ON reduction_goals
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_initiatives_updated_at
    BEFORE UPDATE ON initiatives
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const SEED_CATEGORIES_SQL: &str = r"
INSERT INTO categories (scope_number, code, name, description) VALUES
(1, 'S1-FUEL', 'Fuel Combustion', 'Emissions from fuel combustion in stationary and mobile sources'),
(1, 'S1-FUGITIVE', 'Fugitive Emissions', 'Intentional or unintentional releases such as refrigerants and SF6'),
(1, 'S1-PROCESS', 'Process Emissions', 'Emissions from industrial processes'),
(2, 'S2-ELECTRICITY', 'Purchased Electricity', 'Electricity purchased from the grid or suppliers'),
(2, 'S2-HEAT-STEAM', 'Purchased Heat, Steam, and Cooling', 'District heating, cooling, or steam'),
(3, 'S3-05-WASTE', 'Waste Generated in Operations', 'Disposal and treatment of waste'),
(3, 'S3-06-BUSINESS-TRAVEL', 'Business Travel', 'Employee business travel'),
(3, 'S3-07-COMMUTING', 'Employee Commuting', 'Employee commuting between home and work');
";

const SEED_SOURCES_SQL: &str = r"
-- System catalog with UK Government 2025 conversion factors.
INSERT INTO emission_sources (category_id, code, name, factor_value, unit, description, region, reference_year, kind) VALUES
((SELECT id FROM categories WHERE code = 'S1-FUEL'), 'S1-F-001', 'Natural Gas', 0.18385, 'kWh', 'Natural gas combustion in boilers, furnaces, or other equipment', 'UK', 2025, 'system'),
((SELECT id FROM categories WHERE code = 'S1-FUEL'), 'S1-F-002', 'LPG (Liquefied Petroleum Gas)', 0.21449, 'litre', 'LPG combustion', 'UK', 2025, 'system'),
((SELECT id FROM categories WHERE code = 'S1-FUEL'), 'S1-F-010', 'Petrol (Gasoline)', 0.24167, 'litre', 'Petrol combustion in vehicles or equipment', 'UK', 2025, 'system'),
((SELECT id FROM categories WHERE code = 'S1-FUEL'), 'S1-F-011', 'Diesel (100% mineral)', 0.25198, 'litre', 'Diesel fuel combustion', 'UK', 2025, 'system'),
((SELECT id FROM categories WHERE code = 'S1-FUEL'), 'S1-F-013', 'Fuel Oil', 0.26835, 'litre', 'Heavy fuel oil combustion', 'UK', 2025, 'system'),
((SELECT id FROM categories WHERE code = 'S1-FUEL'), 'S1-F-020', 'Coal (Industrial)', 0.32281, 'kg', 'Coal combustion in industrial facilities', 'UK', 2025, 'system'),
((SELECT id FROM categories WHERE code = 'S1-FUGITIVE'), 'S1-R-001', 'R134a (HFC-134a)', 1430.00000, 'kg', 'Common refrigerant in automotive and commercial applications', 'UK', 2025, 'system'),
((SELECT id FROM categories WHERE code = 'S1-FUGITIVE'), 'S1-R-003', 'R410A', 2088.00000, 'kg', 'Refrigerant used in air conditioning', 'UK', 2025, 'system'),
((SELECT id FROM categories WHERE code = 'S1-FUGITIVE'), 'S1-R-020', 'SF6 (Sulphur Hexafluoride)', 23500.00000, 'kg', 'Electrical insulation gas', 'UK', 2025, 'system'),
((SELECT id FROM categories WHERE code = 'S2-ELECTRICITY'), 'S2-E-001', 'UK Electricity (Grid Average)', 0.21233, 'kWh', 'Grid average electricity consumption', 'UK', 2025, 'system'),
((SELECT id FROM categories WHERE code = 'S2-HEAT-STEAM'), 'S2-H-001', 'District Heating', 0.02070, 'kWh', 'Heat purchased from a district network', 'UK', 2025, 'system'),
((SELECT id FROM categories WHERE code = 'S2-HEAT-STEAM'), 'S2-H-002', 'Heat and Steam', 0.18739, 'kWh', 'Purchased heat and steam', 'UK', 2025, 'system'),
((SELECT id FROM categories WHERE code = 'S3-05-WASTE'), 'S3-W-001', 'Mixed Waste to Landfill', 0.46863, 'kg', 'Commercial and industrial waste landfilled', 'UK', 2025, 'system'),
((SELECT id FROM categories WHERE code = 'S3-06-BUSINESS-TRAVEL'), 'S3-T-001', 'Short-haul Flight (Economy)', 0.15102, 'passenger.km', 'Short-haul flights, average passenger', 'UK', 2025, 'system'),
((SELECT id FROM categories WHERE code = 'S3-06-BUSINESS-TRAVEL'), 'S3-T-002', 'Rail (National)', 0.03546, 'passenger.km', 'National rail travel', 'UK', 2025, 'system'),
((SELECT id FROM categories WHERE code = 'S3-07-COMMUTING'), 'S3-C-001', 'Average Car (Unknown Fuel)', 0.16984, 'km', 'Commuting by average passenger car', 'UK', 2025, 'system');
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS initiative_progress CASCADE;
DROP TABLE IF EXISTS initiatives CASCADE;
DROP TABLE IF EXISTS reduction_goals CASCADE;
DROP TABLE IF EXISTS emission_entries CASCADE;
DROP TABLE IF EXISTS factor_history CASCADE;
DROP TABLE IF EXISTS emission_sources CASCADE;
DROP TABLE IF EXISTS categories CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS organizations CASCADE;

DROP FUNCTION IF EXISTS set_updated_at CASCADE;

DROP TYPE IF EXISTS initiative_status;
DROP TYPE IF EXISTS goal_status;
DROP TYPE IF EXISTS source_kind;
DROP TYPE IF EXISTS verification_status;
DROP TYPE IF EXISTS org_status;
DROP TYPE IF EXISTS user_role;
";
