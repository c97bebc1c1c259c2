use vernissage_common::{
    ARTIST_IMAGES_TABLE, ARTISTS_TABLE, ARTWORK_IMAGES_TABLE, ARTWORKS_TABLE, CREATED_FIELD_NAME,
    EVENTS_TABLE, ID_FIELD_NAME, IS_PUBLISHED_FIELD_NAME, ONBOARDING_FLAGS_TABLE, OUTBOX_TABLE,
    PUBLISHED_FIELD_NAME, SESSIONS_TABLE, SUBMISSIONS_TABLE, UPDATED_FIELD_NAME, USERS_TABLE,
    VENUE_MEMBERS_TABLE, VENUES_TABLE, VERSION_FIELD_NAME,
};

use crate::domain::tables::{Column, ForeignKeyConstraint, Index, OnDelete, Table};

/// All tables of the directory, in creation order (referenced tables first)
pub fn schema_tables() -> Vec<Table> {
    vec![
        users_table(),
        sessions_table(),
        artists_table(),
        artist_images_table(),
        venues_table(),
        venue_members_table(),
        events_table(),
        artworks_table(),
        artwork_images_table(),
        submissions_table(),
        outbox_table(),
        onboarding_flags_table(),
    ]
}

fn id_column() -> Column {
    Column::primary_key(ID_FIELD_NAME, "UUID")
}

fn created_column() -> Column {
    Column::new(CREATED_FIELD_NAME, "TIMESTAMPTZ", true, false, Some("now()"))
}

fn updated_column() -> Column {
    Column::new(UPDATED_FIELD_NAME, "TIMESTAMPTZ", true, false, Some("now()"))
}

fn is_published_column() -> Column {
    Column::new(IS_PUBLISHED_FIELD_NAME, "BOOLEAN", true, false, Some("false"))
}

fn users_table() -> Table {
    Table::new(
        USERS_TABLE,
        vec![
            id_column(),
            Column::new("email", "TEXT", true, true, None),
            Column::nullable("display_name", "TEXT"),
            Column::new("role", "TEXT", true, false, Some("'USER'")),
            created_column(),
        ],
        Vec::new(),
        Vec::new(),
    )
}

fn sessions_table() -> Table {
    Table::new(
        SESSIONS_TABLE,
        vec![
            Column::primary_key("token", "TEXT"),
            Column::required("user_id", "UUID"),
            created_column(),
            Column::required("expires_at", "TIMESTAMPTZ"),
        ],
        vec![ForeignKeyConstraint::new(
            SESSIONS_TABLE,
            "user_id",
            USERS_TABLE,
            ID_FIELD_NAME,
        )],
        vec![Index::new(SESSIONS_TABLE, vec!["user_id"], false)],
    )
}

fn artists_table() -> Table {
    Table::new(
        ARTISTS_TABLE,
        vec![
            id_column(),
            Column::required("owner_user_id", "UUID"),
            Column::required("name", "TEXT"),
            Column::nullable("bio", "TEXT"),
            Column::nullable("avatar_asset_id", "UUID"),
            Column::nullable("avatar_url", "TEXT"),
            Column::nullable("website_url", "TEXT"),
            is_published_column(),
            created_column(),
            updated_column(),
        ],
        vec![ForeignKeyConstraint::new(
            ARTISTS_TABLE,
            "owner_user_id",
            USERS_TABLE,
            ID_FIELD_NAME,
        )],
        vec![Index::new(ARTISTS_TABLE, vec!["owner_user_id"], false)],
    )
}

fn artist_images_table() -> Table {
    Table::new(
        ARTIST_IMAGES_TABLE,
        vec![
            id_column(),
            Column::required("artist_id", "UUID"),
            Column::required("asset_id", "UUID"),
            Column::new("position", "INTEGER", true, false, Some("0")),
            created_column(),
        ],
        vec![ForeignKeyConstraint::new(
            ARTIST_IMAGES_TABLE,
            "artist_id",
            ARTISTS_TABLE,
            ID_FIELD_NAME,
        )],
        vec![Index::new(ARTIST_IMAGES_TABLE, vec!["artist_id", "position"], false)],
    )
}

fn venues_table() -> Table {
    Table::new(
        VENUES_TABLE,
        vec![
            id_column(),
            Column::required("owner_user_id", "UUID"),
            Column::required("name", "TEXT"),
            Column::nullable("description", "TEXT"),
            Column::nullable("address_line", "TEXT"),
            Column::nullable("city", "TEXT"),
            Column::nullable("country", "TEXT"),
            Column::nullable("cover_asset_id", "UUID"),
            Column::nullable("cover_url", "TEXT"),
            is_published_column(),
            created_column(),
            updated_column(),
        ],
        vec![ForeignKeyConstraint::new(
            VENUES_TABLE,
            "owner_user_id",
            USERS_TABLE,
            ID_FIELD_NAME,
        )],
        vec![Index::new(VENUES_TABLE, vec!["owner_user_id"], false)],
    )
}

fn venue_members_table() -> Table {
    Table::new(
        VENUE_MEMBERS_TABLE,
        vec![
            Column::primary_key("venue_id", "UUID"),
            Column::primary_key("user_id", "UUID"),
            Column::required("role", "TEXT"),
            created_column(),
        ],
        vec![
            ForeignKeyConstraint::new(VENUE_MEMBERS_TABLE, "venue_id", VENUES_TABLE, ID_FIELD_NAME),
            ForeignKeyConstraint::new(VENUE_MEMBERS_TABLE, "user_id", USERS_TABLE, ID_FIELD_NAME),
        ],
        vec![Index::new(VENUE_MEMBERS_TABLE, vec!["user_id"], false)],
    )
}

fn events_table() -> Table {
    Table::new(
        EVENTS_TABLE,
        vec![
            id_column(),
            Column::required("owner_user_id", "UUID"),
            Column::nullable("venue_id", "UUID"),
            Column::required("title", "TEXT"),
            Column::nullable("description", "TEXT"),
            Column::nullable("ticket_url", "TEXT"),
            Column::nullable("starts_at", "TIMESTAMPTZ"),
            is_published_column(),
            Column::nullable(PUBLISHED_FIELD_NAME, "TIMESTAMPTZ"),
            created_column(),
            updated_column(),
        ],
        vec![
            ForeignKeyConstraint::new(EVENTS_TABLE, "owner_user_id", USERS_TABLE, ID_FIELD_NAME),
            ForeignKeyConstraint::new(EVENTS_TABLE, "venue_id", VENUES_TABLE, ID_FIELD_NAME)
                .on_delete(OnDelete::SetNull),
        ],
        vec![
            Index::new(EVENTS_TABLE, vec!["owner_user_id"], false),
            Index::new(EVENTS_TABLE, vec!["venue_id"], false),
        ],
    )
}

fn artworks_table() -> Table {
    Table::new(
        ARTWORKS_TABLE,
        vec![
            id_column(),
            Column::required("artist_id", "UUID"),
            Column::required("title", "TEXT"),
            Column::nullable("description", "TEXT"),
            Column::nullable("featured_asset_id", "UUID"),
            is_published_column(),
            created_column(),
            updated_column(),
        ],
        vec![ForeignKeyConstraint::new(
            ARTWORKS_TABLE,
            "artist_id",
            ARTISTS_TABLE,
            ID_FIELD_NAME,
        )],
        vec![Index::new(ARTWORKS_TABLE, vec!["artist_id"], false)],
    )
}

fn artwork_images_table() -> Table {
    Table::new(
        ARTWORK_IMAGES_TABLE,
        vec![
            id_column(),
            Column::required("artwork_id", "UUID"),
            Column::required("asset_id", "UUID"),
            Column::new("position", "INTEGER", true, false, Some("0")),
            created_column(),
        ],
        vec![ForeignKeyConstraint::new(
            ARTWORK_IMAGES_TABLE,
            "artwork_id",
            ARTWORKS_TABLE,
            ID_FIELD_NAME,
        )],
        vec![Index::new(ARTWORK_IMAGES_TABLE, vec!["artwork_id", "position"], false)],
    )
}

fn submissions_table() -> Table {
    Table::new(
        SUBMISSIONS_TABLE,
        vec![
            id_column(),
            Column::required("submission_type", "TEXT"),
            Column::nullable("kind", "TEXT"),
            Column::required("status", "TEXT"),
            Column::required("submitter_user_id", "UUID"),
            Column::required("target_id", "UUID"),
            Column::nullable("note", "TEXT"),
            Column::nullable("decision_reason", "TEXT"),
            Column::nullable("submitted_at", "TIMESTAMPTZ"),
            Column::nullable("decided_at", "TIMESTAMPTZ"),
            Column::nullable("decided_by_user_id", "UUID"),
            Column::new(VERSION_FIELD_NAME, "INTEGER", true, false, Some("1")),
            created_column(),
            updated_column(),
        ],
        vec![
            ForeignKeyConstraint::new(
                SUBMISSIONS_TABLE,
                "submitter_user_id",
                USERS_TABLE,
                ID_FIELD_NAME,
            ),
            ForeignKeyConstraint::new(
                SUBMISSIONS_TABLE,
                "decided_by_user_id",
                USERS_TABLE,
                ID_FIELD_NAME,
            )
            .on_delete(OnDelete::SetNull),
        ],
        vec![
            Index::new(
                SUBMISSIONS_TABLE,
                vec!["submission_type", "target_id", "created_at"],
                false,
            ),
            Index::new(SUBMISSIONS_TABLE, vec!["status", "submitted_at"], false),
            Index::new(SUBMISSIONS_TABLE, vec!["submitter_user_id"], false),
            // one in-flight submission per target
            Index::new(SUBMISSIONS_TABLE, vec!["submission_type", "target_id"], true)
                .partial("status = 'SUBMITTED'"),
        ],
    )
}

fn outbox_table() -> Table {
    Table::new(
        OUTBOX_TABLE,
        vec![
            id_column(),
            Column::required("notification_type", "TEXT"),
            Column::required("to_email", "TEXT"),
            Column::new("dedupe_key", "TEXT", true, true, None),
            Column::required("payload", "JSONB"),
            created_column(),
            Column::nullable("claimed_at", "TIMESTAMPTZ"),
            Column::nullable("delivered_at", "TIMESTAMPTZ"),
            Column::new("attempts", "INTEGER", true, false, Some("0")),
            Column::nullable("last_error", "TEXT"),
        ],
        Vec::new(),
        vec![Index::new(OUTBOX_TABLE, vec!["delivered_at", "created_at"], false)],
    )
}

fn onboarding_flags_table() -> Table {
    Table::new(
        ONBOARDING_FLAGS_TABLE,
        vec![
            Column::primary_key("user_id", "UUID"),
            Column::primary_key("flag", "TEXT"),
            Column::new("set_at", "TIMESTAMPTZ", true, false, Some("now()")),
        ],
        vec![ForeignKeyConstraint::new(
            ONBOARDING_FLAGS_TABLE,
            "user_id",
            USERS_TABLE,
            ID_FIELD_NAME,
        )],
        Vec::new(),
    )
}
