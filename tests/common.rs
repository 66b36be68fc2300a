#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use dbcutover::core::migrate::{STATEMENT_BREAKPOINT, run_migrations};
use dbcutover::db::session::{Dialect, SessionError, SqlSession, SqlValue};
use dbcutover::db::sqlite::SqliteSession;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub fn cutover() -> Command {
    let mut cmd = cargo_bin_cmd!("dbcutover");
    cmd.env_remove("DATABASE_URL").env("NO_COLOR", "1");
    cmd
}

/// Create a fresh, empty directory inside the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("dbcutover_{}", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

pub fn sqlite_url(db: &Path) -> String {
    format!("sqlite://{}", db.display())
}

pub const SCHEMA_USERS: &str = r#"CREATE TABLE users (
    id               INTEGER PRIMARY KEY,
    openId           TEXT NOT NULL UNIQUE,
    name             TEXT,
    email            TEXT,
    loginMethod      TEXT,
    role             TEXT NOT NULL DEFAULT 'user' CHECK(role IN ('user','admin')),
    nickname         TEXT,
    location         TEXT,
    profileImageUrl  TEXT,
    isSellerActive   INTEGER NOT NULL DEFAULT 0,
    ageVerified      INTEGER NOT NULL DEFAULT 0,
    createdAt        TEXT NOT NULL,
    updatedAt        TEXT NOT NULL,
    lastSignedIn     TEXT NOT NULL
);
--> statement-breakpoint
CREATE INDEX idx_users_email ON users(email);"#;

pub const SCHEMA_MARKET: &str = r#"CREATE TABLE sellerProfiles (
    id                  INTEGER PRIMARY KEY,
    userId              INTEGER NOT NULL UNIQUE REFERENCES users(id),
    shopName            TEXT NOT NULL,
    description         TEXT,
    location            TEXT,
    profileImageUrl     TEXT,
    verificationStatus  TEXT NOT NULL DEFAULT 'pending',
    rating              REAL DEFAULT 0,
    totalReviews        INTEGER DEFAULT 0,
    createdAt           TEXT NOT NULL,
    updatedAt           TEXT NOT NULL
);
--> statement-breakpoint
CREATE TABLE listings (
    id                INTEGER PRIMARY KEY,
    sellerId          INTEGER NOT NULL REFERENCES users(id),
    type              TEXT NOT NULL,
    strain            TEXT NOT NULL,
    description       TEXT,
    quantity          INTEGER NOT NULL,
    priceType         TEXT NOT NULL CHECK(priceType IN ('fixed','offer')),
    fixedPrice        REAL,
    offerMinPrice     REAL,
    acceptsOffers     INTEGER NOT NULL DEFAULT 0,
    imageUrl          TEXT,
    images            TEXT,
    shippingVerified  INTEGER NOT NULL DEFAULT 1,
    shippingPickup    INTEGER NOT NULL DEFAULT 0,
    status            TEXT NOT NULL DEFAULT 'draft',
    genetics          TEXT,
    seedBank          TEXT,
    growMethod        TEXT,
    seedType          TEXT,
    thcContent        TEXT,
    cbdContent        TEXT,
    floweringTime     TEXT,
    yieldInfo         TEXT,
    flavorProfile     TEXT,
    origin            TEXT,
    createdAt         TEXT NOT NULL,
    updatedAt         TEXT NOT NULL
);
--> statement-breakpoint
CREATE TABLE systemSettings (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    "key"        TEXT NOT NULL UNIQUE,
    "value"      TEXT NOT NULL,
    category     TEXT,
    description  TEXT,
    updatedAt    TEXT NOT NULL,
    updatedBy    INTEGER
);"#;

/// Write the two schema scripts into `<dir>/drizzle` and return that path.
pub fn write_schema(dir: &Path) -> PathBuf {
    let scripts = dir.join("drizzle");
    fs::create_dir_all(&scripts).expect("create drizzle dir");
    write_file(&scripts, "0000_users.sql", SCHEMA_USERS);
    write_file(&scripts, "0001_market.sql", SCHEMA_MARKET);
    write_file(&scripts, "meta.json", "{}");
    scripts
}

/// A SQLite database with the full schema applied and committed.
pub fn migrated_db(name: &str) -> (PathBuf, PathBuf) {
    let dir = temp_dir(name);
    let scripts = write_schema(&dir);
    let db = dir.join("target.sqlite");

    let session = SqliteSession::open(&db).expect("open sqlite");
    run_migrations(session, &scripts, STATEMENT_BREAKPOINT).expect("apply schema");

    (dir, db)
}

pub fn open_db(db: &Path) -> rusqlite::Connection {
    rusqlite::Connection::open(db).expect("open db")
}

pub fn count(db: &Path, table: &str) -> i64 {
    open_db(db)
        .query_row(&format!("SELECT COUNT(*) FROM \"{}\"", table), [], |r| {
            r.get(0)
        })
        .expect("count rows")
}

pub const USERS_HEADER: &str = "id,openId,name,email,loginMethod,role,nickname,location,profileImageUrl,isSellerActive,ageVerified,createdAt,updatedAt,lastSignedIn";

pub const USERS_CSV: &str = "\
id,openId,name,email,loginMethod,role,nickname,location,profileImageUrl,isSellerActive,ageVerified,createdAt,updatedAt,lastSignedIn
1,oid-1,Alice,alice@example.com,oauth,super_admin,ali,Berlin,,1,1,2025-01-01 10:00:00,2025-01-02 10:00:00,2025-01-03 10:00:00
2,oid-2,Bob,,oauth,user,,,,0,,2025-01-01 11:00:00,2025-01-01 11:00:00,2025-01-01 11:00:00
";

pub const PROFILES_CSV: &str = "\
id,userId,shopName,description,location,profileImageUrl,verificationStatus,rating,totalReviews,createdAt,updatedAt
10,1,Alice Greens,Cuttings from Berlin,Berlin,,verified,4.5,12,2025-01-04 09:00:00,2025-01-04 09:00:00
";

pub const LISTINGS_CSV: &str = "\
id,sellerId,type,strain,description,quantity,priceType,fixedPrice,offerMinPrice,acceptsOffers,imageUrl,images,shippingVerified,shippingPickup,status,genetics,seedBank,growMethod,seedType,thcContent,cbdContent,floweringTime,yieldInfo,flavorProfile,origin,createdAt,updatedAt
100,1,cutting,Northern Lights,,3,fixed,12.5,,,,,,,active,indica,,soil,,,,,,,,2025-01-05 08:00:00,2025-01-05 08:00:00
101,1,seed,Haze,Old auction,5,auction,,8,1,,,0,1,active,sativa,,,,,,,,,,2025-01-05 08:30:00,2025-01-05 08:30:00
";

pub const SETTINGS_CSV: &str = "\
key,value,description,category,updatedAt
platform_fee_percent,5,Fee taken per sale,fees,2025-01-06 12:00:00
maintenance_mode,false,,,2025-01-06 12:00:00
";

/// Write all four exports into `dir` with the default file names.
pub fn write_exports(dir: &Path) {
    write_file(dir, "users.csv", USERS_CSV);
    write_file(dir, "sellerProfiles.csv", PROFILES_CSV);
    write_file(dir, "listings.csv", LISTINGS_CSV);
    write_file(dir, "systemSettings.csv", SETTINGS_CSV);
}

/// In-memory session that records every call.
///
/// Statements containing one of the `fail_on` needles fail with the paired
/// error; everything else succeeds.
pub struct RecordingSession {
    pub dialect: Dialect,
    pub executed: Vec<(String, Vec<SqlValue>)>,
    pub fail_on: Vec<(String, SessionError)>,
    pub commits: usize,
    pub rollbacks: usize,
}

impl RecordingSession {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            executed: Vec::new(),
            fail_on: Vec::new(),
            commits: 0,
            rollbacks: 0,
        }
    }

    pub fn failing(mut self, needle: &str, err: SessionError) -> Self {
        self.fail_on.push((needle.to_string(), err));
        self
    }

    pub fn statements(&self) -> Vec<&str> {
        self.executed.iter().map(|(sql, _)| sql.as_str()).collect()
    }
}

impl SqlSession for RecordingSession {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, SessionError> {
        self.executed.push((sql.to_string(), params.to_vec()));
        match self.fail_on.iter().find(|(needle, _)| sql.contains(needle.as_str())) {
            Some((_, err)) => Err(err.clone()),
            None => Ok(1),
        }
    }

    fn query_count(&mut self, _sql: &str) -> Result<i64, SessionError> {
        Ok(0)
    }

    fn commit(&mut self) -> Result<(), SessionError> {
        self.commits += 1;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SessionError> {
        self.rollbacks += 1;
        Ok(())
    }
}
