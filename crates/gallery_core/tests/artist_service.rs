use chrono::NaiveDate;
use gallery_core::db::open_db_in_memory;
use gallery_core::model::artist::NewArtist;
use gallery_core::{
    AddArtistDto, AddArtworkDto, AddCategoryDto, Artist, ArtistId, ArtistRepository,
    ArtistService, ArtworkService, CategoryService, RepoResult, ServiceStatus,
    SqliteArtistRepository, SqliteArtworkRepository, SqliteCategoryRepository, UpdateArtistDto,
};
use rusqlite::Connection;

/// Another writer bumps the row between the service's read and its replace.
struct ConcurrentlyEditedArtists<'conn> {
    inner: SqliteArtistRepository<'conn>,
    conn: &'conn Connection,
}

impl ArtistRepository for ConcurrentlyEditedArtists<'_> {
    fn create_artist(&self, artist: &NewArtist) -> RepoResult<ArtistId> {
        self.inner.create_artist(artist)
    }

    fn get_artist(&self, id: ArtistId) -> RepoResult<Option<Artist>> {
        self.inner.get_artist(id)
    }

    fn list_artists(&self) -> RepoResult<Vec<Artist>> {
        self.inner.list_artists()
    }

    fn replace_artist(&self, artist: &Artist) -> RepoResult<Artist> {
        self.conn
            .execute(
                "UPDATE artists SET name = 'Edited elsewhere', row_version = row_version + 1 WHERE artist_id = ?1;",
                [artist.artist_id],
            )
            .unwrap();
        self.inner.replace_artist(artist)
    }

    fn delete_artist(&self, id: ArtistId) -> RepoResult<usize> {
        self.inner.delete_artist(id)
    }
}

type Artists<'conn> = ArtistService<SqliteArtistRepository<'conn>, SqliteArtworkRepository<'conn>>;

fn artist_service(conn: &Connection) -> Artists<'_> {
    ArtistService::new(
        SqliteArtistRepository::try_new(conn).unwrap(),
        SqliteArtworkRepository::try_new(conn).unwrap(),
    )
}

fn add_artist(service: &Artists<'_>, name: &str) -> i64 {
    let response = service.add_artist(&AddArtistDto {
        name: name.to_string(),
        bio: None,
        email: format!("{}@example.com", name.to_lowercase()),
    });
    assert_eq!(response.status, ServiceStatus::Created, "{response}");
    response.created_id.unwrap()
}

fn add_category(conn: &Connection, name: &str) -> i64 {
    let service = CategoryService::new(
        SqliteCategoryRepository::try_new(conn).unwrap(),
        SqliteArtworkRepository::try_new(conn).unwrap(),
    );
    service
        .add_category(&AddCategoryDto {
            c_name: name.to_string(),
            date_created: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        })
        .created_id
        .unwrap()
}

fn artwork_service(
    conn: &Connection,
) -> ArtworkService<
    SqliteArtworkRepository<'_>,
    SqliteArtistRepository<'_>,
    SqliteCategoryRepository<'_>,
> {
    ArtworkService::new(
        SqliteArtworkRepository::try_new(conn).unwrap(),
        SqliteArtistRepository::try_new(conn).unwrap(),
        SqliteCategoryRepository::try_new(conn).unwrap(),
    )
}

fn add_artwork(conn: &Connection, title: &str, artist_id: i64, category_id: i64) -> i64 {
    let response = artwork_service(conn).add_artwork(&AddArtworkDto {
        title: title.to_string(),
        description: String::new(),
        date_posted: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        artist_id,
        category_id,
    });
    assert_eq!(response.status, ServiceStatus::Created, "{response}");
    response.created_id.unwrap()
}

#[test]
fn add_then_find_artist_without_artworks() {
    let conn = open_db_in_memory().unwrap();
    let service = artist_service(&conn);

    let response = service.add_artist(&AddArtistDto {
        name: "Frida Kahlo".to_string(),
        bio: Some("Mexican painter".to_string()),
        email: "frida@example.com".to_string(),
    });
    assert_eq!(response.status, ServiceStatus::Created);
    let artist_id = response.created_id.unwrap();

    let artist = service.find_artist(artist_id).unwrap();
    assert_eq!(artist.name, "Frida Kahlo");
    assert_eq!(artist.bio.as_deref(), Some("Mexican painter"));
    assert_eq!(artist.total_artworks, 0);
    assert!(artist.artworks_title.is_empty());
}

#[test]
fn list_artists_reports_counts_and_titles_per_artist() {
    let conn = open_db_in_memory().unwrap();
    let service = artist_service(&conn);
    let first = add_artist(&service, "Okeeffe");
    let second = add_artist(&service, "Hopper");
    let third = add_artist(&service, "Basquiat");
    let category = add_category(&conn, "Modern");
    add_artwork(&conn, "Jimson Weed", first, category);
    add_artwork(&conn, "Nighthawks", second, category);
    add_artwork(&conn, "Black Iris", first, category);

    let artists = service.list_artists().unwrap();
    assert_eq!(
        artists.iter().map(|a| a.artist_id).collect::<Vec<_>>(),
        vec![first, second, third]
    );
    assert_eq!(artists[0].total_artworks, 2);
    assert_eq!(artists[0].artworks_title, vec!["Jimson Weed", "Black Iris"]);
    assert_eq!(artists[1].total_artworks, 1);
    assert_eq!(artists[1].artworks_title, vec!["Nighthawks"]);
    assert_eq!(artists[2].total_artworks, 0);
    assert!(artists[2].artworks_title.is_empty());
}

#[test]
fn add_artist_with_blank_email_is_an_error() {
    let conn = open_db_in_memory().unwrap();
    let service = artist_service(&conn);

    let response = service.add_artist(&AddArtistDto {
        name: "Nameless".to_string(),
        bio: None,
        email: " ".to_string(),
    });
    assert_eq!(response.status, ServiceStatus::Error);
    assert_eq!(response.messages[0], "There was an error adding the artist.");
    assert_eq!(response.messages.len(), 2);
    assert!(service.list_artists().unwrap().is_empty());
}

#[test]
fn find_missing_artist_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = artist_service(&conn);

    let response = service.find_artist(41).unwrap_err();
    assert_eq!(response.status, ServiceStatus::NotFound);
}

#[test]
fn update_artist_replaces_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = artist_service(&conn);
    let artist_id = add_artist(&service, "Degas");

    let response = service.update_artist(
        artist_id,
        &UpdateArtistDto {
            artist_id,
            name: "Edgar Degas".to_string(),
            bio: Some("Dancers".to_string()),
            email: "edgar@example.com".to_string(),
        },
    );
    assert_eq!(response.status, ServiceStatus::Updated);

    let artist = service.find_artist(artist_id).unwrap();
    assert_eq!(artist.name, "Edgar Degas");
    assert_eq!(artist.bio.as_deref(), Some("Dancers"));
}

#[test]
fn update_artist_with_mismatched_id_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = artist_service(&conn);
    let artist_id = add_artist(&service, "Manet");

    let response = service.update_artist(
        artist_id,
        &UpdateArtistDto {
            artist_id: artist_id + 1,
            name: "Renamed".to_string(),
            bio: None,
            email: "renamed@example.com".to_string(),
        },
    );
    assert_eq!(response.status, ServiceStatus::Error);
    assert_eq!(response.messages, vec!["Artist ID mismatch."]);
    assert_eq!(service.find_artist(artist_id).unwrap().name, "Manet");
}

#[test]
fn update_missing_artist_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = artist_service(&conn);

    let response = service.update_artist(
        9,
        &UpdateArtistDto {
            artist_id: 9,
            name: "Ghost".to_string(),
            bio: None,
            email: "ghost@example.com".to_string(),
        },
    );
    assert_eq!(response.status, ServiceStatus::NotFound);
}

#[test]
fn delete_artist_cascades_to_artworks() {
    let conn = open_db_in_memory().unwrap();
    let service = artist_service(&conn);
    let removed = add_artist(&service, "Cezanne");
    let kept = add_artist(&service, "Gauguin");
    let category = add_category(&conn, "Post-Impressionism");
    let removed_artworks = [
        add_artwork(&conn, "Mont Sainte-Victoire", removed, category),
        add_artwork(&conn, "The Card Players", removed, category),
    ];
    let kept_artwork = add_artwork(&conn, "Tahitian Women", kept, category);

    let response = service.delete_artist(removed);
    assert_eq!(response.status, ServiceStatus::Deleted);
    assert_eq!(
        service.find_artist(removed).unwrap_err().status,
        ServiceStatus::NotFound
    );

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM artworks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 1);
    assert_eq!(service.find_artist(kept).unwrap().total_artworks, 1);

    let artworks = artwork_service(&conn);
    for artwork_id in removed_artworks {
        assert_eq!(
            artworks.find_artwork(artwork_id).unwrap_err().status,
            ServiceStatus::NotFound
        );
    }
    assert_eq!(artworks.find_artwork(kept_artwork).unwrap().artist_id, kept);
}

#[test]
fn concurrent_edit_during_update_is_an_error_and_keeps_newer_row() {
    let conn = open_db_in_memory().unwrap();
    let artist_id = add_artist(&artist_service(&conn), "Sargent");
    let service = ArtistService::new(
        ConcurrentlyEditedArtists {
            inner: SqliteArtistRepository::try_new(&conn).unwrap(),
            conn: &conn,
        },
        SqliteArtworkRepository::try_new(&conn).unwrap(),
    );

    let response = service.update_artist(
        artist_id,
        &UpdateArtistDto {
            artist_id,
            name: "John Singer Sargent".to_string(),
            bio: None,
            email: "jss@example.com".to_string(),
        },
    );
    assert_eq!(response.status, ServiceStatus::Error);
    assert_eq!(response.messages[0], "An error occurred updating the record.");
    assert!(response.messages[1].contains("modified concurrently"));

    let stored = artist_service(&conn).find_artist(artist_id).unwrap();
    assert_eq!(stored.name, "Edited elsewhere");
}

#[test]
fn delete_missing_artist_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = artist_service(&conn);

    let response = service.delete_artist(3);
    assert_eq!(response.status, ServiceStatus::NotFound);
    assert_eq!(
        response.messages,
        vec!["Artist cannot be deleted because it does not exist."]
    );
}

#[test]
fn artist_dto_serializes_projection_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = artist_service(&conn);
    let artist_id = add_artist(&service, "Magritte");

    let json = serde_json::to_value(service.find_artist(artist_id).unwrap()).unwrap();
    assert_eq!(json["artist_id"], artist_id);
    assert_eq!(json["name"], "Magritte");
    assert_eq!(json["total_artworks"], 0);
    assert!(json["artworks_title"].as_array().unwrap().is_empty());
    assert!(json.get("email").is_none());
}
