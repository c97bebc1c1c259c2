use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use vernissage_common::{
    ARTIST_IMAGES_TABLE, ARTWORK_IMAGES_TABLE, ArtistId, ArtworkId, AssetId, EventId, UserId,
    VenueId, VenueRole,
};

use crate::domain::content::{Artist, Artwork, ContentRef, Event, PublicationChange, Venue};
use crate::domain::repository::{ContentRepository, RepositoryError};
use crate::domain::submission::Submission;
use crate::infrastructure::persistence::PostgresRepository;
use crate::infrastructure::persistence::rows::{
    ArtistRow, ArtworkRow, EventRow, VenueRow, parse_column,
};
use crate::infrastructure::persistence::submissions::insert_submission;

const ARTIST_COLUMNS: &str = "id, owner_user_id, name, bio, avatar_asset_id, avatar_url, \
    website_url, is_published, created_at, updated_at";
const VENUE_COLUMNS: &str = "id, owner_user_id, name, description, address_line, city, country, \
    cover_asset_id, cover_url, is_published, created_at, updated_at";
const EVENT_COLUMNS: &str = "id, owner_user_id, venue_id, title, description, ticket_url, \
    starts_at, is_published, published_at, created_at, updated_at";
const ARTWORK_COLUMNS: &str = "id, artist_id, title, description, featured_asset_id, \
    is_published, created_at, updated_at";

/// Image lists live in `<table>(id, <owner_column>, asset_id, position)`
struct ImageTable {
    table: &'static str,
    owner_column: &'static str,
}

const ARTIST_GALLERY: ImageTable = ImageTable {
    table: ARTIST_IMAGES_TABLE,
    owner_column: "artist_id",
};
const ARTWORK_IMAGES: ImageTable = ImageTable {
    table: ARTWORK_IMAGES_TABLE,
    owner_column: "artwork_id",
};

impl ImageTable {
    async fn load(&self, pool: &PgPool, owner: Uuid) -> Result<Vec<AssetId>, sqlx::Error> {
        let sql = format!(
            "SELECT asset_id FROM {} WHERE {} = $1 ORDER BY position",
            self.table, self.owner_column
        );
        sqlx::query_scalar::<_, AssetId>(&sql)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    async fn replace(
        &self,
        conn: &mut PgConnection,
        owner: Uuid,
        images: &[AssetId],
    ) -> Result<(), sqlx::Error> {
        let delete = format!("DELETE FROM {} WHERE {} = $1", self.table, self.owner_column);
        sqlx::query(&delete).bind(owner).execute(&mut *conn).await?;

        let insert = format!(
            "INSERT INTO {} (id, {}, asset_id, position) VALUES ($1, $2, $3, $4)",
            self.table, self.owner_column
        );
        for (position, asset_id) in images.iter().enumerate() {
            sqlx::query(&insert)
                .bind(Uuid::new_v4())
                .bind(owner)
                .bind(asset_id)
                .bind(position as i32)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }
}

fn expect_one_row(rows_affected: u64) -> Result<(), RepositoryError> {
    if rows_affected == 0 {
        Err(RepositoryError::NotFound)
    } else {
        Ok(())
    }
}

/// Writes the published flag of one record; events also carry their publish time.
pub(super) async fn apply_publication(
    conn: &mut PgConnection,
    change: PublicationChange,
) -> Result<(), RepositoryError> {
    let result = match change.content {
        ContentRef::Artist(id) => {
            sqlx::query("UPDATE artists SET is_published = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(change.is_published)
                .execute(&mut *conn)
                .await?
        }
        ContentRef::Venue(id) => {
            sqlx::query("UPDATE venues SET is_published = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(change.is_published)
                .execute(&mut *conn)
                .await?
        }
        ContentRef::Event(id) => {
            sqlx::query(
                "UPDATE events SET is_published = $2, published_at = $3, updated_at = now() \
                 WHERE id = $1",
            )
            .bind(id)
            .bind(change.is_published)
            .bind(change.published_at)
            .execute(&mut *conn)
            .await?
        }
        ContentRef::Artwork(id) => {
            sqlx::query("UPDATE artworks SET is_published = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(change.is_published)
                .execute(&mut *conn)
                .await?
        }
    };
    expect_one_row(result.rows_affected())
}

async fn insert_artist_row(conn: &mut PgConnection, artist: &Artist) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO artists (id, owner_user_id, name, bio, avatar_asset_id, avatar_url, \
         website_url, is_published, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(artist.id)
    .bind(artist.owner_user_id)
    .bind(&artist.name)
    .bind(&artist.bio)
    .bind(artist.avatar_asset_id)
    .bind(&artist.avatar_url)
    .bind(&artist.website_url)
    .bind(artist.is_published)
    .bind(artist.created_at)
    .bind(artist.updated_at)
    .execute(&mut *conn)
    .await?;
    ARTIST_GALLERY
        .replace(conn, artist.id.as_uuid(), &artist.gallery)
        .await
}

impl ContentRepository for PostgresRepository {
    async fn find_artist(&self, id: ArtistId) -> Result<Option<Artist>, RepositoryError> {
        let sql = format!("SELECT {} FROM artists WHERE id = $1", ARTIST_COLUMNS);
        let row = sqlx::query_as::<_, ArtistRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let gallery = ARTIST_GALLERY.load(self.pool(), id.as_uuid()).await?;
        Ok(Some(row.into_artist(gallery)))
    }

    async fn find_venue(&self, id: VenueId) -> Result<Option<Venue>, RepositoryError> {
        let sql = format!("SELECT {} FROM venues WHERE id = $1", VENUE_COLUMNS);
        let row = sqlx::query_as::<_, VenueRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(Venue::from))
    }

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        let sql = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(Event::from))
    }

    async fn find_artwork(&self, id: ArtworkId) -> Result<Option<Artwork>, RepositoryError> {
        let sql = format!("SELECT {} FROM artworks WHERE id = $1", ARTWORK_COLUMNS);
        let row = sqlx::query_as::<_, ArtworkRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let images = ARTWORK_IMAGES.load(self.pool(), id.as_uuid()).await?;
        Ok(Some(row.into_artwork(images)))
    }

    async fn venue_role(
        &self,
        venue_id: VenueId,
        user_id: UserId,
    ) -> Result<Option<VenueRole>, RepositoryError> {
        let role: Option<String> =
            sqlx::query_scalar("SELECT role FROM venue_members WHERE venue_id = $1 AND user_id = $2")
                .bind(venue_id)
                .bind(user_id)
                .fetch_optional(self.pool())
                .await?;
        role.as_deref().map(parse_column::<VenueRole>).transpose()
    }

    async fn insert_artist(&self, artist: &Artist, draft: &Submission) -> Result<(), RepositoryError> {
        let mut tx = self.pool().begin().await?;
        insert_artist_row(&mut tx, artist).await?;
        insert_submission(&mut tx, draft).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn insert_venue(&self, venue: &Venue, draft: &Submission) -> Result<(), RepositoryError> {
        let mut tx = self.pool().begin().await?;
        sqlx::query(
            "INSERT INTO venues (id, owner_user_id, name, description, address_line, city, \
             country, cover_asset_id, cover_url, is_published, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(venue.id)
        .bind(venue.owner_user_id)
        .bind(&venue.name)
        .bind(&venue.description)
        .bind(&venue.address_line)
        .bind(&venue.city)
        .bind(&venue.country)
        .bind(venue.cover_asset_id)
        .bind(&venue.cover_url)
        .bind(venue.is_published)
        .bind(venue.created_at)
        .bind(venue.updated_at)
        .execute(&mut *tx)
        .await?;
        sqlx::query("INSERT INTO venue_members (venue_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(venue.id)
            .bind(venue.owner_user_id)
            .bind(VenueRole::Owner.as_str())
            .execute(&mut *tx)
            .await?;
        insert_submission(&mut tx, draft).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn insert_event(&self, event: &Event, draft: &Submission) -> Result<(), RepositoryError> {
        let mut tx = self.pool().begin().await?;
        sqlx::query(
            "INSERT INTO events (id, owner_user_id, venue_id, title, description, ticket_url, \
             starts_at, is_published, published_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(event.id)
        .bind(event.owner_user_id)
        .bind(event.venue_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.ticket_url)
        .bind(event.starts_at)
        .bind(event.is_published)
        .bind(event.published_at)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&mut *tx)
        .await?;
        insert_submission(&mut tx, draft).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn insert_artwork(&self, artwork: &Artwork) -> Result<(), RepositoryError> {
        let mut tx = self.pool().begin().await?;
        sqlx::query(
            "INSERT INTO artworks (id, artist_id, title, description, featured_asset_id, \
             is_published, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(artwork.id)
        .bind(artwork.artist_id)
        .bind(&artwork.title)
        .bind(&artwork.description)
        .bind(artwork.featured_asset_id)
        .bind(artwork.is_published)
        .bind(artwork.created_at)
        .bind(artwork.updated_at)
        .execute(&mut *tx)
        .await?;
        ARTWORK_IMAGES
            .replace(&mut tx, artwork.id.as_uuid(), &artwork.images)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_artist(&self, artist: &Artist) -> Result<(), RepositoryError> {
        let mut tx = self.pool().begin().await?;
        let result = sqlx::query(
            "UPDATE artists SET name = $2, bio = $3, avatar_asset_id = $4, avatar_url = $5, \
             website_url = $6, is_published = $7, updated_at = $8 WHERE id = $1",
        )
        .bind(artist.id)
        .bind(&artist.name)
        .bind(&artist.bio)
        .bind(artist.avatar_asset_id)
        .bind(&artist.avatar_url)
        .bind(&artist.website_url)
        .bind(artist.is_published)
        .bind(artist.updated_at)
        .execute(&mut *tx)
        .await?;
        expect_one_row(result.rows_affected())?;
        ARTIST_GALLERY
            .replace(&mut tx, artist.id.as_uuid(), &artist.gallery)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_venue(&self, venue: &Venue) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE venues SET name = $2, description = $3, address_line = $4, city = $5, \
             country = $6, cover_asset_id = $7, cover_url = $8, is_published = $9, \
             updated_at = $10 WHERE id = $1",
        )
        .bind(venue.id)
        .bind(&venue.name)
        .bind(&venue.description)
        .bind(&venue.address_line)
        .bind(&venue.city)
        .bind(&venue.country)
        .bind(venue.cover_asset_id)
        .bind(&venue.cover_url)
        .bind(venue.is_published)
        .bind(venue.updated_at)
        .execute(self.pool())
        .await?;
        expect_one_row(result.rows_affected())
    }

    async fn update_event(&self, event: &Event) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE events SET venue_id = $2, title = $3, description = $4, ticket_url = $5, \
             starts_at = $6, is_published = $7, published_at = $8, updated_at = $9 WHERE id = $1",
        )
        .bind(event.id)
        .bind(event.venue_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.ticket_url)
        .bind(event.starts_at)
        .bind(event.is_published)
        .bind(event.published_at)
        .bind(event.updated_at)
        .execute(self.pool())
        .await?;
        expect_one_row(result.rows_affected())
    }

    async fn update_artwork(&self, artwork: &Artwork) -> Result<(), RepositoryError> {
        let mut tx = self.pool().begin().await?;
        let result = sqlx::query(
            "UPDATE artworks SET title = $2, description = $3, featured_asset_id = $4, \
             is_published = $5, updated_at = $6 WHERE id = $1",
        )
        .bind(artwork.id)
        .bind(&artwork.title)
        .bind(&artwork.description)
        .bind(artwork.featured_asset_id)
        .bind(artwork.is_published)
        .bind(artwork.updated_at)
        .execute(&mut *tx)
        .await?;
        expect_one_row(result.rows_affected())?;
        ARTWORK_IMAGES
            .replace(&mut tx, artwork.id.as_uuid(), &artwork.images)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn set_publication(&self, change: PublicationChange) -> Result<(), RepositoryError> {
        let mut conn = self.pool().acquire().await?;
        apply_publication(&mut conn, change).await
    }
}
