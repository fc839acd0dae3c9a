//! GraphStore - SurrealDB-backed social graph storage
//!
//! One store instance is created at process start and shared by every
//! service. Users live in the `user` table keyed by their identity-provider
//! id, posts in the `post` table, and the two relationship types are the
//! `follows` and `posted` relation tables.
//!
//! # Invariants enforced at the schema level
//!
//! - `user_username_unique`: UNIQUE index on `user.username_lower`, closing
//!   the race window between an availability check and the write
//! - `follows_pair_unique`: UNIQUE index on `follows(in, out)`, so at most
//!   one edge exists per ordered pair
//!
//! # Query discipline
//!
//! Every method issues exactly one parametrized query (multi-statement
//! batches count as one round trip) and decodes the response into fixed row
//! structs before returning. Ranking and ordering decisions beyond what the
//! store can express cheaply belong to the service layer.
//!
//! # Examples
//!
//! ```rust,no_run
//! use flock_core::db::GraphStore;
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = GraphStore::open(PathBuf::from("./data/flock.db")).await?;
//!     let profile = store.user_by_id("user_2b8b...").await?;
//!     Ok(())
//! }
//! ```

use crate::db::error::{StoreError, USERNAME_UNIQUE_INDEX};
use crate::models::{ProfileInput, UserProfile, DEFAULT_AVATAR};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::engine::remote::http::{Client, Http};
use surrealdb::opt::auth::Root;
use surrealdb::{Connection, Surreal};

/// Embedded store used by the server binary and the seed tool.
pub type EmbeddedStore = GraphStore<Db>;

/// Store connected to a remote SurrealDB server over HTTP.
pub type HttpStore = GraphStore<Client>;

/// Internal struct matching the `user` table row shape.
///
/// `username_lower` and `created_at` are store bookkeeping and are not
/// surfaced on the profile model; serde ignores them on decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRow {
    user_id: String,
    name: String,
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    bio: String,
    #[serde(default = "default_avatar")]
    avatar: String,
}

fn default_avatar() -> String {
    DEFAULT_AVATAR.to_string()
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        UserProfile {
            id: row.user_id,
            name: row.name,
            username: row.username,
            email: row.email,
            bio: row.bio,
            avatar: row.avatar,
        }
    }
}

/// Aggregate row for `GROUP ALL` count queries.
#[derive(Debug, Clone, Deserialize)]
struct CountRow {
    total: u64,
}

/// Outcome of an idempotent follow write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FollowOutcome {
    /// The source user record exists
    pub source_found: bool,
    /// The target user record exists
    pub target_found: bool,
    /// A new edge was written (false when it already existed)
    pub created: bool,
}

/// One two-hop edge: a user the requester follows (`source_id`) following a
/// suggestion candidate (`candidate_id`).
#[derive(Debug, Clone, Deserialize)]
pub struct FollowHop {
    pub source_id: String,
    pub candidate_id: String,
}

/// Follower total for one user, from a grouped edge count.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowerCount {
    pub user_id: String,
    pub total: u64,
}

/// Raw material for suggestion ranking, fetched in one round trip.
#[derive(Debug, Clone)]
pub struct SuggestionRows {
    pub hops: Vec<FollowHop>,
    pub candidates: Vec<UserProfile>,
    pub follower_counts: Vec<FollowerCount>,
}

/// Profiles plus follower totals, fetched in one round trip. Used by search
/// and popularity queries.
#[derive(Debug, Clone)]
pub struct RankedRows {
    pub profiles: Vec<UserProfile>,
    pub follower_counts: Vec<FollowerCount>,
}

/// One post authored by a followee, joined with its author summary.
///
/// Post fields are optional so that malformed records decode instead of
/// failing the whole feed; the assembler drops them.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedRow {
    pub author_id: String,
    pub author_name: String,
    pub author_username: String,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// SurrealDB-backed graph store.
///
/// Generic over the connection type so the same code serves the embedded
/// RocksDB engine, the in-memory test engine, and a remote HTTP client.
pub struct GraphStore<C = Db>
where
    C: Connection,
{
    db: Surreal<C>,
}

impl GraphStore<Db> {
    /// Open an embedded store backed by RocksDB at the given path.
    pub async fn open(db_path: PathBuf) -> Result<Self, StoreError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| StoreError::connection("open embedded RocksDB store", e))?;
        Self::bootstrap(db).await
    }

    /// Open an in-memory store. Used by tests; nothing survives the handle.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| StoreError::connection("open in-memory store", e))?;
        Self::bootstrap(db).await
    }
}

impl GraphStore<Client> {
    /// Connect to a remote SurrealDB server over HTTP with root credentials.
    pub async fn connect_http(
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, StoreError> {
        let db = Surreal::new::<Http>(address)
            .await
            .map_err(|e| StoreError::connection(format!("connect to {address}"), e))?;
        db.signin(Root { username, password })
            .await
            .map_err(|e| StoreError::connection(format!("sign in to {address}"), e))?;
        Self::bootstrap(db).await
    }
}

impl<C> GraphStore<C>
where
    C: Connection,
{
    /// Select the namespace/database and define the schema.
    async fn bootstrap(db: Surreal<C>) -> Result<Self, StoreError> {
        db.use_ns("flock")
            .use_db("graph")
            .await
            .map_err(|e| StoreError::connection("select namespace/database", e))?;

        let store = Self { db };
        store.initialize_schema().await?;
        Ok(store)
    }

    /// Define tables, relation tables, and uniqueness indexes.
    ///
    /// Idempotent: every statement uses `IF NOT EXISTS`, so repeated startup
    /// against an existing data directory is safe.
    async fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = format!(
            "
            DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
            DEFINE TABLE IF NOT EXISTS post SCHEMALESS;
            DEFINE TABLE IF NOT EXISTS follows SCHEMALESS TYPE RELATION IN user OUT user;
            DEFINE TABLE IF NOT EXISTS posted SCHEMALESS TYPE RELATION IN user OUT post;
            DEFINE INDEX IF NOT EXISTS {USERNAME_UNIQUE_INDEX} ON user FIELDS username_lower UNIQUE;
            DEFINE INDEX IF NOT EXISTS follows_pair_unique ON follows FIELDS in, out UNIQUE;
            "
        );

        self.db
            .query(schema)
            .await
            .map_err(|e| StoreError::schema("define tables and indexes", e))?
            .check()
            .map_err(|e| StoreError::schema("define tables and indexes", e))?;

        tracing::debug!("graph schema initialized");
        Ok(())
    }

    //
    // USER DIRECTORY OPERATIONS
    //

    /// Insert a new user record.
    ///
    /// The record key is the identity-provider id, so double onboarding of
    /// the same identity fails on the record itself; a username collision
    /// fails on the uniqueness index and is reported as
    /// [`StoreError::UsernameTaken`].
    pub async fn create_user(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let query = "
            CREATE type::thing('user', $id) CONTENT {
                user_id: $id,
                name: $name,
                username: $username,
                username_lower: string::lowercase($username),
                email: $email,
                bio: $bio,
                avatar: $avatar,
                created_at: $created_at
            };
        ";

        self.db
            .query(query)
            .bind(("id", profile.id.clone()))
            .bind(("name", profile.name.clone()))
            .bind(("username", profile.username.clone()))
            .bind(("email", profile.email.clone()))
            .bind(("bio", profile.bio.clone()))
            .bind(("avatar", profile.avatar.clone()))
            .bind(("created_at", Utc::now().to_rfc3339()))
            .await
            .map_err(|e| StoreError::query("create user", e))?
            .check()
            .map_err(|e| StoreError::from_username_write("create user", &profile.username, e))?;

        Ok(())
    }

    /// Fetch a user by identity-provider id. Absence is `Ok(None)`.
    pub async fn user_by_id(&self, id: &str) -> Result<Option<UserProfile>, StoreError> {
        let query = "SELECT * FROM type::thing('user', $id);";

        let mut response = self
            .db
            .query(query)
            .bind(("id", id.to_string()))
            .await
            .map_err(|e| StoreError::query("fetch user by id", e))?
            .check()
            .map_err(|e| StoreError::query("fetch user by id", e))?;

        let rows: Vec<UserRow> = response
            .take(0)
            .map_err(|e| StoreError::decode("fetch user by id", e))?;

        Ok(rows.into_iter().next().map(Into::into))
    }

    /// Fetch a user by exact username, case-sensitive as stored.
    ///
    /// Case normalization only applies to uniqueness checks, never lookups.
    pub async fn user_by_username(&self, username: &str) -> Result<Option<UserProfile>, StoreError> {
        let query = "SELECT * FROM user WHERE username = $username LIMIT 1;";

        let mut response = self
            .db
            .query(query)
            .bind(("username", username.to_string()))
            .await
            .map_err(|e| StoreError::query("fetch user by username", e))?
            .check()
            .map_err(|e| StoreError::query("fetch user by username", e))?;

        let rows: Vec<UserRow> = response
            .take(0)
            .map_err(|e| StoreError::decode("fetch user by username", e))?;

        Ok(rows.into_iter().next().map(Into::into))
    }

    /// Count users whose username matches case-insensitively, optionally
    /// ignoring one user id (so a user can keep their own username during an
    /// update).
    pub async fn count_username_matches(
        &self,
        username: &str,
        excluded_id: Option<&str>,
    ) -> Result<u64, StoreError> {
        let query = if excluded_id.is_some() {
            "SELECT count() AS total FROM user
             WHERE username_lower = string::lowercase($username) AND user_id != $excluded
             GROUP ALL;"
        } else {
            "SELECT count() AS total FROM user
             WHERE username_lower = string::lowercase($username)
             GROUP ALL;"
        };

        let mut builder = self.db.query(query).bind(("username", username.to_string()));
        if let Some(excluded) = excluded_id {
            builder = builder.bind(("excluded", excluded.to_string()));
        }

        let mut response = builder
            .await
            .map_err(|e| StoreError::query("count username matches", e))?
            .check()
            .map_err(|e| StoreError::query("count username matches", e))?;

        let rows: Vec<CountRow> = response
            .take(0)
            .map_err(|e| StoreError::decode("count username matches", e))?;

        Ok(rows.first().map(|row| row.total).unwrap_or(0))
    }

    /// Overwrite the four editable profile fields.
    ///
    /// Returns `Ok(None)` when no user has the given id. A username
    /// collision is reported as [`StoreError::UsernameTaken`].
    pub async fn update_user(
        &self,
        id: &str,
        input: &ProfileInput,
    ) -> Result<Option<UserProfile>, StoreError> {
        let query = "
            UPDATE type::thing('user', $id) SET
                name = $name,
                username = $username,
                username_lower = string::lowercase($username),
                bio = $bio,
                avatar = $avatar;
        ";

        let mut response = self
            .db
            .query(query)
            .bind(("id", id.to_string()))
            .bind(("name", input.name.clone()))
            .bind(("username", input.username.clone()))
            .bind(("bio", input.bio.clone()))
            .bind(("avatar", input.avatar.clone()))
            .await
            .map_err(|e| StoreError::query("update user", e))?
            .check()
            .map_err(|e| StoreError::from_username_write("update user", &input.username, e))?;

        let rows: Vec<UserRow> = response
            .take(0)
            .map_err(|e| StoreError::decode("update user", e))?;

        Ok(rows.into_iter().next().map(Into::into))
    }

    //
    // FOLLOW GRAPH OPERATIONS
    //

    /// Idempotently ensure a single `follows` edge source -> target.
    ///
    /// The whole check-and-relate runs as one batch; the outcome reports
    /// which endpoints exist so the caller can turn a missing user into an
    /// error instead of a silent no-op.
    pub async fn ensure_follow(
        &self,
        source_id: &str,
        target_id: &str,
    ) -> Result<FollowOutcome, StoreError> {
        let query = "
            LET $src = type::thing('user', $source);
            LET $tgt = type::thing('user', $target);
            LET $src_match = (SELECT VALUE user_id FROM $src);
            LET $tgt_match = (SELECT VALUE user_id FROM $tgt);
            LET $existing = (SELECT VALUE id FROM follows WHERE in = $src AND out = $tgt);
            IF $src_match && $tgt_match && !$existing {
                RELATE $src->follows->$tgt SET created_at = $created_at;
            };
            RETURN {
                source_found: !!$src_match,
                target_found: !!$tgt_match,
                created: !!($src_match && $tgt_match && !$existing)
            };
        ";

        let mut response = self
            .db
            .query(query)
            .bind(("source", source_id.to_string()))
            .bind(("target", target_id.to_string()))
            .bind(("created_at", Utc::now().to_rfc3339()))
            .await
            .map_err(|e| StoreError::query("ensure follow edge", e))?
            .check()
            .map_err(|e| StoreError::query("ensure follow edge", e))?;

        let outcome: Option<FollowOutcome> = response
            .take(6)
            .map_err(|e| StoreError::decode("ensure follow edge", e))?;

        outcome.ok_or_else(|| StoreError::missing("ensure follow edge"))
    }

    /// Remove the `follows` edge source -> target if present. Removing an
    /// absent edge is a no-op, not an error.
    pub async fn delete_follow(&self, source_id: &str, target_id: &str) -> Result<(), StoreError> {
        let query = "
            DELETE follows
            WHERE in = type::thing('user', $source) AND out = type::thing('user', $target);
        ";

        self.db
            .query(query)
            .bind(("source", source_id.to_string()))
            .bind(("target", target_id.to_string()))
            .await
            .map_err(|e| StoreError::query("delete follow edge", e))?
            .check()
            .map_err(|e| StoreError::query("delete follow edge", e))?;

        Ok(())
    }

    /// Users with an edge into `user_id`, unordered.
    pub async fn followers_of(&self, user_id: &str) -> Result<Vec<UserProfile>, StoreError> {
        let query = "
            LET $target = type::thing('user', $id);
            LET $sources = (SELECT VALUE in FROM follows WHERE out = $target);
            SELECT * FROM $sources;
        ";

        let mut response = self
            .db
            .query(query)
            .bind(("id", user_id.to_string()))
            .await
            .map_err(|e| StoreError::query("fetch followers", e))?
            .check()
            .map_err(|e| StoreError::query("fetch followers", e))?;

        let rows: Vec<UserRow> = response
            .take(2)
            .map_err(|e| StoreError::decode("fetch followers", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Users with an edge out of `user_id`, unordered.
    pub async fn following_of(&self, user_id: &str) -> Result<Vec<UserProfile>, StoreError> {
        let query = "
            LET $source = type::thing('user', $id);
            LET $targets = (SELECT VALUE out FROM follows WHERE in = $source);
            SELECT * FROM $targets;
        ";

        let mut response = self
            .db
            .query(query)
            .bind(("id", user_id.to_string()))
            .await
            .map_err(|e| StoreError::query("fetch following", e))?
            .check()
            .map_err(|e| StoreError::query("fetch following", e))?;

        let rows: Vec<UserRow> = response
            .take(2)
            .map_err(|e| StoreError::decode("fetch following", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Follower and following totals as two independent counts in one batch.
    pub async fn follow_counts(&self, user_id: &str) -> Result<(u64, u64), StoreError> {
        let query = "
            LET $user = type::thing('user', $id);
            SELECT count() AS total FROM follows WHERE out = $user GROUP ALL;
            SELECT count() AS total FROM follows WHERE in = $user GROUP ALL;
        ";

        let mut response = self
            .db
            .query(query)
            .bind(("id", user_id.to_string()))
            .await
            .map_err(|e| StoreError::query("count follows", e))?
            .check()
            .map_err(|e| StoreError::query("count follows", e))?;

        let followers: Vec<CountRow> = response
            .take(1)
            .map_err(|e| StoreError::decode("count followers", e))?;
        let following: Vec<CountRow> = response
            .take(2)
            .map_err(|e| StoreError::decode("count following", e))?;

        Ok((
            followers.first().map(|row| row.total).unwrap_or(0),
            following.first().map(|row| row.total).unwrap_or(0),
        ))
    }

    /// Users followed by both `a` and `b` (intersection of their following
    /// sets), unordered.
    pub async fn mutual_following(&self, a: &str, b: &str) -> Result<Vec<UserProfile>, StoreError> {
        let query = "
            LET $first = (SELECT VALUE out FROM follows WHERE in = type::thing('user', $a));
            LET $second = (SELECT VALUE out FROM follows WHERE in = type::thing('user', $b));
            SELECT * FROM array::intersect($first, $second);
        ";

        let mut response = self
            .db
            .query(query)
            .bind(("a", a.to_string()))
            .bind(("b", b.to_string()))
            .await
            .map_err(|e| StoreError::query("fetch mutual connections", e))?
            .check()
            .map_err(|e| StoreError::query("fetch mutual connections", e))?;

        let rows: Vec<UserRow> = response
            .take(2)
            .map_err(|e| StoreError::decode("fetch mutual connections", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    //
    // RANKING QUERIES
    //

    /// Everything suggestion ranking needs, in one batch: the two-hop edges
    /// (excluding the requester and their existing followees), the candidate
    /// profiles, and each candidate's follower total.
    pub async fn suggestion_rows(&self, user_id: &str) -> Result<SuggestionRows, StoreError> {
        let query = "
            LET $me = type::thing('user', $id);
            LET $following = (SELECT VALUE out FROM follows WHERE in = $me);
            SELECT in.user_id AS source_id, out.user_id AS candidate_id FROM follows
                WHERE in INSIDE $following AND out != $me AND out NOTINSIDE $following;
            LET $candidates = array::distinct((SELECT VALUE out FROM follows
                WHERE in INSIDE $following AND out != $me AND out NOTINSIDE $following));
            SELECT * FROM $candidates;
            SELECT out.user_id AS user_id, count() AS total FROM follows
                WHERE out INSIDE $candidates GROUP BY user_id;
        ";

        let mut response = self
            .db
            .query(query)
            .bind(("id", user_id.to_string()))
            .await
            .map_err(|e| StoreError::query("fetch suggestion rows", e))?
            .check()
            .map_err(|e| StoreError::query("fetch suggestion rows", e))?;

        let hops: Vec<FollowHop> = response
            .take(2)
            .map_err(|e| StoreError::decode("fetch suggestion hops", e))?;
        let candidates: Vec<UserRow> = response
            .take(4)
            .map_err(|e| StoreError::decode("fetch suggestion candidates", e))?;
        let follower_counts: Vec<FollowerCount> = response
            .take(5)
            .map_err(|e| StoreError::decode("fetch suggestion follower counts", e))?;

        Ok(SuggestionRows {
            hops,
            candidates: candidates.into_iter().map(Into::into).collect(),
            follower_counts,
        })
    }

    /// Case-insensitive substring search over name and username, excluding
    /// one user id. Returns the matches and their follower totals in one
    /// batch.
    pub async fn search_rows(
        &self,
        term: &str,
        excluding_user_id: &str,
        limit: Option<usize>,
    ) -> Result<RankedRows, StoreError> {
        let limit_clause = if limit.is_some() { " LIMIT $limit" } else { "" };
        let query = format!(
            "
            LET $needle = string::lowercase($term);
            SELECT * FROM user WHERE user_id != $excluding
                AND (string::contains(username_lower, $needle)
                     OR string::contains(string::lowercase(name), $needle)){limit_clause};
            LET $matched = (SELECT VALUE id FROM user WHERE user_id != $excluding
                AND (string::contains(username_lower, $needle)
                     OR string::contains(string::lowercase(name), $needle)){limit_clause});
            SELECT out.user_id AS user_id, count() AS total FROM follows
                WHERE out INSIDE $matched GROUP BY user_id;
            "
        );

        let mut builder = self
            .db
            .query(query)
            .bind(("term", term.to_string()))
            .bind(("excluding", excluding_user_id.to_string()));
        if let Some(limit) = limit {
            builder = builder.bind(("limit", limit as i64));
        }

        let mut response = builder
            .await
            .map_err(|e| StoreError::query("search users", e))?
            .check()
            .map_err(|e| StoreError::query("search users", e))?;

        let profiles: Vec<UserRow> = response
            .take(1)
            .map_err(|e| StoreError::decode("search users", e))?;
        let follower_counts: Vec<FollowerCount> = response
            .take(3)
            .map_err(|e| StoreError::decode("search follower counts", e))?;

        Ok(RankedRows {
            profiles: profiles.into_iter().map(Into::into).collect(),
            follower_counts,
        })
    }

    /// Users ranked by follower total, descending, together with their
    /// profiles. Only users with at least one follower produce a row: the
    /// ranking reads from the edge table, so zero-follower users never
    /// appear.
    pub async fn popular_rows(&self, limit: usize) -> Result<RankedRows, StoreError> {
        let query = "
            LET $ranked = (SELECT out.user_id AS user_id, count() AS total FROM follows
                GROUP BY user_id ORDER BY total DESC LIMIT $limit);
            SELECT user_id, total FROM $ranked;
            SELECT * FROM user WHERE user_id INSIDE $ranked.user_id;
        ";

        let mut response = self
            .db
            .query(query)
            .bind(("limit", limit as i64))
            .await
            .map_err(|e| StoreError::query("fetch popular users", e))?
            .check()
            .map_err(|e| StoreError::query("fetch popular users", e))?;

        let follower_counts: Vec<FollowerCount> = response
            .take(1)
            .map_err(|e| StoreError::decode("fetch popular follower counts", e))?;
        let profiles: Vec<UserRow> = response
            .take(2)
            .map_err(|e| StoreError::decode("fetch popular profiles", e))?;

        Ok(RankedRows {
            profiles: profiles.into_iter().map(Into::into).collect(),
            follower_counts,
        })
    }

    /// All users except the given id, ordered by username ascending.
    pub async fn users_except(&self, user_id: &str) -> Result<Vec<UserProfile>, StoreError> {
        let query = "SELECT * FROM user WHERE user_id != $id ORDER BY username ASC;";

        let mut response = self
            .db
            .query(query)
            .bind(("id", user_id.to_string()))
            .await
            .map_err(|e| StoreError::query("list users", e))?
            .check()
            .map_err(|e| StoreError::query("list users", e))?;

        let rows: Vec<UserRow> = response
            .take(0)
            .map_err(|e| StoreError::decode("list users", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// A random sample of users. Used by the seed tool.
    pub async fn random_users(&self, limit: usize) -> Result<Vec<UserProfile>, StoreError> {
        let query = "SELECT * FROM user ORDER BY rand() LIMIT $limit;";

        let mut response = self
            .db
            .query(query)
            .bind(("limit", limit as i64))
            .await
            .map_err(|e| StoreError::query("sample users", e))?
            .check()
            .map_err(|e| StoreError::query("sample users", e))?;

        let rows: Vec<UserRow> = response
            .take(0)
            .map_err(|e| StoreError::decode("sample users", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    //
    // POST OPERATIONS
    //

    /// Posts authored by anyone `user_id` follows, joined with the author
    /// summary, unordered. The assembler sorts and filters.
    pub async fn feed_rows(&self, user_id: &str) -> Result<Vec<FeedRow>, StoreError> {
        let query = "
            LET $me = type::thing('user', $id);
            LET $authors = (SELECT VALUE out FROM follows WHERE in = $me);
            SELECT in.user_id AS author_id, in.name AS author_name,
                   in.username AS author_username, out.post_id AS post_id,
                   out.content AS content, out.created_at AS created_at
            FROM posted WHERE in INSIDE $authors;
        ";

        let mut response = self
            .db
            .query(query)
            .bind(("id", user_id.to_string()))
            .await
            .map_err(|e| StoreError::query("fetch feed rows", e))?
            .check()
            .map_err(|e| StoreError::query("fetch feed rows", e))?;

        response
            .take(2)
            .map_err(|e| StoreError::decode("fetch feed rows", e))
    }

    /// Insert a post record and its `posted` edge in one batch.
    ///
    /// Returns false (and writes nothing) when the author does not exist.
    pub async fn create_post(
        &self,
        author_id: &str,
        post_id: &str,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let query = "
            LET $author = type::thing('user', $author_id);
            LET $author_match = (SELECT VALUE user_id FROM $author);
            IF $author_match {
                CREATE type::thing('post', $post_id) CONTENT {
                    post_id: $post_id,
                    content: $content,
                    created_at: $created_at
                };
                RELATE $author->posted->(type::thing('post', $post_id)) SET created_at = $created_at;
            };
            RETURN !!$author_match;
        ";

        let mut response = self
            .db
            .query(query)
            .bind(("author_id", author_id.to_string()))
            .bind(("post_id", post_id.to_string()))
            .bind(("content", content.to_string()))
            .bind(("created_at", created_at.to_rfc3339()))
            .await
            .map_err(|e| StoreError::query("create post", e))?
            .check()
            .map_err(|e| StoreError::query("create post", e))?;

        let created: Option<bool> = response
            .take(3)
            .map_err(|e| StoreError::decode("create post", e))?;

        created.ok_or_else(|| StoreError::missing("create post"))
    }
}
