//! SQL schema for the Teledok SQLite store.
//!
//! Executed once at connection startup. Table and column names follow the
//! relational model: three entity tables plus the `ClientFounder` join table.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS People (
    Id          INTEGER PRIMARY KEY AUTOINCREMENT,
    Name        TEXT NOT NULL,
    Surname     TEXT NOT NULL,
    Patronymic  TEXT,
    Birthday    TEXT NOT NULL,   -- YYYY-MM-DD
    Address     TEXT
);

-- No ON DELETE action: a person still backing a founder cannot be deleted.
CREATE TABLE IF NOT EXISTS Founders (
    Id          INTEGER PRIMARY KEY AUTOINCREMENT,
    PersonId    INTEGER NOT NULL REFERENCES People(Id),
    AddedDate   TEXT NOT NULL,
    UpdateDate  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Clients (
    Id          INTEGER PRIMARY KEY AUTOINCREMENT,
    Name        TEXT NOT NULL,
    Type        INTEGER NOT NULL,   -- 0 individual entrepreneur, 1 legal entity
    TIN         TEXT NOT NULL,      -- digit string, leading zeros kept
    AddedDate   TEXT NOT NULL,
    UpdateDate  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ClientFounder (
    ClientsId   INTEGER NOT NULL REFERENCES Clients(Id)  ON DELETE CASCADE,
    FoundersId  INTEGER NOT NULL REFERENCES Founders(Id) ON DELETE CASCADE,
    PRIMARY KEY (ClientsId, FoundersId)
);

CREATE INDEX IF NOT EXISTS founders_person_idx        ON Founders(PersonId);
CREATE INDEX IF NOT EXISTS client_founder_founder_idx ON ClientFounder(FoundersId);

PRAGMA user_version = 1;
";
