use std::collections::HashMap;
use std::path::Path;

use mockito::Matcher;
use poster_fetch_scraper::*;

const POSTER: &[u8] = b"\xFF\xD8poster\xFF\xD9";
const PLACEHOLDER: &[u8] = b"\x89PNGplaceholder";

fn http() -> reqwest::blocking::Client {
    build_http_client(Some(DEFAULT_TIMEOUT)).unwrap()
}

/// Resolver backed by a fixed table; unknown titles are not found.
struct TableResolver(HashMap<String, String>);

impl TableResolver {
    fn new(entries: &[(&str, String)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(t, u)| (t.to_string(), u.clone()))
                .collect(),
        )
    }
}

impl PosterResolver for TableResolver {
    fn name(&self) -> &'static str {
        "table"
    }

    fn resolve(&self, title: &str) -> Result<String, ScrapeError> {
        self.0.get(title).cloned().ok_or_else(|| ScrapeError::NotFound {
            title: title.to_string(),
            reason: "empty search results".to_string(),
        })
    }
}

fn write_csv(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// -- sort -------------------------------------------------------------------

#[test]
fn sort_files_posters_by_type_and_vibe() {
    let mut server = mockito::Server::new();
    let inception = server
        .mock("GET", "/img/inception.jpg")
        .with_status(200)
        .with_body(POSTER)
        .create();
    let office = server
        .mock("GET", "/img/office.jpg")
        .with_status(200)
        .with_body(POSTER)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let csv = "title,type,vibe\n\
               Inception,movie,mind-bending\n\
               Zzzzz Nonexistent Film 1984,movie,weird\n\
               The Office,tv,cozy\n";
    let csv_path = write_csv(dir.path(), "movies_list.csv", csv);
    let save_dir = dir.path().join("posters");

    let resolver = TableResolver::new(&[
        ("Inception", format!("{}/img/inception.jpg", server.url())),
        ("The Office", format!("{}/img/office.jpg", server.url())),
    ]);
    let options = SortOptions::new(&csv_path, &save_dir);

    let mut events = Vec::new();
    let log = sort_posters(&resolver, &http(), &options, &mut |e: PipelineEvent| events.push(e)).unwrap();

    let inception_path = save_dir.join("movie").join("mind-bending").join("Inception.jpg");
    let office_path = save_dir.join("tv").join("cozy").join("The_Office.jpg");
    assert_eq!(std::fs::read(&inception_path).unwrap(), POSTER);
    assert_eq!(std::fs::read(&office_path).unwrap(), POSTER);
    assert!(!save_dir.join("movie").join("weird").exists());

    let summary = log.summary();
    assert_eq!(summary.downloaded, 2);
    assert_eq!(summary.unresolved, 1);

    // Source CSV is never modified.
    assert_eq!(std::fs::read_to_string(&csv_path).unwrap(), csv);

    assert!(matches!(events.first(), Some(PipelineEvent::Started { total: None })));
    assert!(matches!(events.last(), Some(PipelineEvent::Done)));
    assert!(events.iter().any(|e| matches!(
        e,
        PipelineEvent::RowFailed { title, .. } if title == "Zzzzz Nonexistent Film 1984"
    )));
    inception.assert();
    office.assert();
}

#[test]
fn sort_overwrites_existing_posters() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/img/heat.jpg")
        .with_status(200)
        .with_body(POSTER)
        .expect(2)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_csv(dir.path(), "list.csv", "title,type,vibe\nHeat,movie,tense\n");
    let save_dir = dir.path().join("posters");
    let resolver = TableResolver::new(&[("Heat", format!("{}/img/heat.jpg", server.url()))]);
    let options = SortOptions::new(&csv_path, &save_dir);

    let mut ignore = |_: PipelineEvent| {};
    sort_posters(&resolver, &http(), &options, &mut ignore).unwrap();
    let log = sort_posters(&resolver, &http(), &options, &mut ignore).unwrap();
    assert_eq!(log.summary().downloaded, 1);
    mock.assert();
}

#[test]
fn sort_download_failure_continues_with_next_row() {
    let mut server = mockito::Server::new();
    let _broken = server.mock("GET", "/img/broken.jpg").with_status(500).create();
    let _ok = server
        .mock("GET", "/img/ok.jpg")
        .with_status(200)
        .with_body(POSTER)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_csv(
        dir.path(),
        "list.csv",
        "title,type,vibe\nBroken,movie,sad\nFine,movie,happy\n",
    );
    let save_dir = dir.path().join("posters");
    let resolver = TableResolver::new(&[
        ("Broken", format!("{}/img/broken.jpg", server.url())),
        ("Fine", format!("{}/img/ok.jpg", server.url())),
    ]);

    let mut ignore = |_: PipelineEvent| {};
    let log = sort_posters(
        &resolver,
        &http(),
        &SortOptions::new(&csv_path, &save_dir),
        &mut ignore,
    )
    .unwrap();

    assert!(!save_dir.join("movie/sad/Broken.jpg").exists());
    assert!(save_dir.join("movie/happy/Fine.jpg").exists());
    let summary = log.summary();
    assert_eq!(summary.download_failed, 1);
    assert_eq!(summary.downloaded, 1);
}

#[test]
fn sort_skips_malformed_rows_and_honours_limit() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_csv(
        dir.path(),
        "list.csv",
        "title,type,vibe\nOnly Two,movie\n,movie,blank\nA,movie,x\nB,movie,y\n",
    );
    let resolver = TableResolver::new(&[
        ("A", "http://unused/a.jpg".to_string()),
        ("B", "http://unused/b.jpg".to_string()),
    ]);
    let mut options = SortOptions::new(&csv_path, dir.path().join("posters"));
    options.dry_run = true;
    options.limit = Some(3);

    let mut ignore = |_: PipelineEvent| {};
    let log = sort_posters(&resolver, &http(), &options, &mut ignore).unwrap();
    let summary = log.summary();
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.planned, 1);
    assert!(!dir.path().join("posters").exists());
}

#[test]
fn sort_missing_csv_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let resolver = TableResolver::new(&[]);
    let options = SortOptions::new(dir.path().join("absent.csv"), dir.path().join("posters"));
    let mut ignore = |_: PipelineEvent| {};
    let err = sort_posters(&resolver, &http(), &options, &mut ignore).unwrap_err();
    assert!(matches!(err, ScrapeError::Catalog(_)));
}

#[test]
fn sort_with_imdb_client_end_to_end() {
    let mut server = mockito::Server::new();
    let _search = server
        .mock("GET", "/suggestion/i/inception.json")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "d": [{"id": "tt1375666", "l": "Inception",
                       "i": {"imageUrl": format!("{}/img/inception.jpg", server.url())}}]
            })
            .to_string(),
        )
        .create();
    let _none = server
        .mock("GET", Matcher::Regex(r"^/suggestion/z/".to_string()))
        .with_status(200)
        .with_body(r#"{"d":[]}"#)
        .create();
    let _image = server
        .mock("GET", "/img/inception.jpg")
        .with_status(200)
        .with_body(POSTER)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_csv(
        dir.path(),
        "list.csv",
        "title,type,vibe\nZzzzz Nonexistent Film 1984,movie,odd\nInception,movie,mind-bending\n",
    );
    let save_dir = dir.path().join("posters");
    let imdb = ImdbClient::new(http()).with_base_url(server.url());

    let mut ignore = |_: PipelineEvent| {};
    let log = sort_posters(
        &imdb,
        &http(),
        &SortOptions::new(&csv_path, &save_dir),
        &mut ignore,
    )
    .unwrap();

    assert!(save_dir.join("movie/mind-bending/Inception.jpg").exists());
    assert!(!save_dir.join("movie/odd").exists());
    assert_eq!(log.summary().unresolved, 1);
}

// -- sync -------------------------------------------------------------------

struct SyncFixture {
    server: mockito::ServerGuard,
    dir: tempfile::TempDir,
}

impl SyncFixture {
    fn new() -> Self {
        Self {
            server: mockito::Server::new(),
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn omdb(&self) -> OmdbClient {
        OmdbClient::new(http(), "test-key").with_base_url(self.server.url())
    }

    fn options(&self, csv_path: &Path) -> SyncOptions {
        let mut options = SyncOptions::new(csv_path, self.dir.path().join("images"));
        options.placeholder_url = format!("{}/placeholder.jpg", self.server.url());
        options
    }
}

#[test]
fn sync_downloads_and_records_paths() {
    let mut fx = SyncFixture::new();
    let url = fx.server.url();

    let omdb_inception = fx
        .server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("t".into(), "Inception".into()))
        .with_status(200)
        .with_body(
            serde_json::json!({
                "Title": "Inception",
                "Poster": format!("{url}/img/inception.jpg"),
                "Response": "True"
            })
            .to_string(),
        )
        .expect(1)
        .create();
    let omdb_missing = fx
        .server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded(
            "t".into(),
            "Zzzzz Nonexistent Film 1984".into(),
        ))
        .with_status(200)
        .with_body(r#"{"Response":"False"}"#)
        .expect(1)
        .create();
    let omdb_heat = fx
        .server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("t".into(), "Heat".into()))
        .expect(0)
        .create();
    let img_inception = fx
        .server
        .mock("GET", "/img/inception.jpg")
        .with_status(200)
        .with_body(POSTER)
        .expect(1)
        .create();
    let img_heat = fx
        .server
        .mock("GET", "/img/heat.jpg")
        .with_status(200)
        .with_body(POSTER)
        .expect(1)
        .create();
    let placeholder = fx
        .server
        .mock("GET", "/placeholder.jpg")
        .with_status(200)
        .with_body(PLACEHOLDER)
        .expect(1)
        .create();

    let csv = format!(
        "title,year,image_url\n\
         Inception,2010,\n\
         Zzzzz Nonexistent Film 1984,1984,\n\
         Heat,1995,{url}/img/heat.jpg\n"
    );
    let csv_path = write_csv(fx.dir.path(), "movies.csv", &csv);
    let options = fx.options(&csv_path);
    let omdb = fx.omdb();
    let images = fx.dir.path().join("images");

    let mut ignore = |_: PipelineEvent| {};
    let report = sync_catalog(&omdb, &http(), &options, &mut ignore).unwrap();
    assert!(report.csv_written);
    let summary = report.log.summary();
    assert_eq!(summary.downloaded, 3);
    assert_eq!(summary.placeholders, 1);

    assert_eq!(std::fs::read(images.join("Inception.jpg")).unwrap(), POSTER);
    assert_eq!(
        std::fs::read(images.join("Zzzzz_Nonexistent_Film_1984.jpg")).unwrap(),
        PLACEHOLDER
    );
    assert_eq!(std::fs::read(images.join("Heat.jpg")).unwrap(), POSTER);

    let written = std::fs::read_to_string(&csv_path).unwrap();
    let expected = format!(
        "title,year,image_url,image_path\n\
         Inception,2010,,{img}/Inception.jpg\n\
         Zzzzz Nonexistent Film 1984,1984,,{img}/Zzzzz_Nonexistent_Film_1984.jpg\n\
         Heat,1995,{url}/img/heat.jpg,{img}/Heat.jpg\n",
        img = images.display()
    );
    assert_eq!(written, expected);

    // Second run: everything is on disk, so no lookups and no downloads.
    let report = sync_catalog(&omdb, &http(), &options, &mut ignore).unwrap();
    let summary = report.log.summary();
    assert_eq!(summary.downloaded, 0);
    assert_eq!(summary.already_present, 3);
    assert_eq!(std::fs::read_to_string(&csv_path).unwrap(), expected);

    omdb_inception.assert();
    omdb_missing.assert();
    omdb_heat.assert();
    img_inception.assert();
    img_heat.assert();
    placeholder.assert();
}

#[test]
fn sync_records_path_even_when_download_fails() {
    let mut fx = SyncFixture::new();
    let url = fx.server.url();
    let _image = fx.server.mock("GET", "/img/gone.jpg").with_status(404).create();

    let csv_path = write_csv(
        fx.dir.path(),
        "movies.csv",
        &format!("title,image_url\nGone Girl,{url}/img/gone.jpg\n"),
    );
    let options = fx.options(&csv_path);

    let mut ignore = |_: PipelineEvent| {};
    let report = sync_catalog(&fx.omdb(), &http(), &options, &mut ignore).unwrap();
    assert_eq!(report.log.summary().download_failed, 1);

    let path = fx.dir.path().join("images").join("Gone_Girl.jpg");
    assert!(!path.exists());
    let written = std::fs::read_to_string(&csv_path).unwrap();
    assert!(written.ends_with(&format!("{}\n", path.display())));
}

#[test]
fn sync_titles_sharing_a_file_are_reported_as_collision() {
    let mut fx = SyncFixture::new();
    let url = fx.server.url();
    let covenant = fx
        .server
        .mock("GET", "/img/covenant.jpg")
        .with_status(200)
        .with_body(POSTER)
        .expect(1)
        .create();
    let other = fx
        .server
        .mock("GET", "/img/other.jpg")
        .with_status(200)
        .with_body(PLACEHOLDER)
        .expect(0)
        .create();

    let csv_path = write_csv(
        fx.dir.path(),
        "movies.csv",
        &format!(
            "title,image_url\n\
             Alien: Covenant,{url}/img/covenant.jpg\n\
             Alien Covenant,{url}/img/other.jpg\n"
        ),
    );
    let options = fx.options(&csv_path);

    let mut ignore = |_: PipelineEvent| {};
    let report = sync_catalog(&fx.omdb(), &http(), &options, &mut ignore).unwrap();
    let summary = report.log.summary();
    assert_eq!(summary.downloaded, 1);
    assert_eq!(summary.already_present, 1);
    assert_eq!(summary.collisions, 1);

    let path = fx.dir.path().join("images").join("Alien_Covenant.jpg");
    assert!(report.log.entries().contains(&LogEntry::Collision {
        title: "Alien Covenant".to_string(),
        other_title: "Alien: Covenant".to_string(),
        path: path.clone(),
    }));
    assert_eq!(std::fs::read(&path).unwrap(), POSTER);

    let written = std::fs::read_to_string(&csv_path).unwrap();
    let recorded = format!(",{}\n", path.display());
    assert_eq!(written.matches(&recorded).count(), 2);

    covenant.assert();
    other.assert();
}

#[test]
fn sync_trims_titles_before_naming_files() {
    let mut fx = SyncFixture::new();
    let url = fx.server.url();
    let _image = fx
        .server
        .mock("GET", "/img/heat.jpg")
        .with_status(200)
        .with_body(POSTER)
        .create();

    let csv_path = write_csv(
        fx.dir.path(),
        "movies.csv",
        &format!("title,image_url\n\"  Heat \",{url}/img/heat.jpg\n"),
    );
    let options = fx.options(&csv_path);

    let mut ignore = |_: PipelineEvent| {};
    let report = sync_catalog(&fx.omdb(), &http(), &options, &mut ignore).unwrap();
    assert_eq!(report.log.summary().downloaded, 1);

    let images = fx.dir.path().join("images");
    assert!(images.join("Heat.jpg").exists());
    assert!(!images.join("__Heat_.jpg").exists());
}

#[test]
fn sync_aborts_on_rejected_api_key_without_touching_csv() {
    let mut fx = SyncFixture::new();
    let _omdb = fx
        .server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"Response":"False","Error":"Invalid API key!"}"#)
        .create();

    let csv = "title\nInception\nHeat\n";
    let csv_path = write_csv(fx.dir.path(), "movies.csv", csv);
    let options = fx.options(&csv_path);

    let mut ignore = |_: PipelineEvent| {};
    let err = sync_catalog(&fx.omdb(), &http(), &options, &mut ignore).unwrap_err();
    assert!(matches!(err, ScrapeError::InvalidCredentials(_)));
    assert_eq!(std::fs::read_to_string(&csv_path).unwrap(), csv);
}

#[test]
fn sync_dry_run_leaves_everything_untouched() {
    let mut fx = SyncFixture::new();
    let _omdb = fx
        .server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"Response":"True","Poster":"https://img.example/x.jpg"}"#)
        .create();

    let csv = "title\nInception\n";
    let csv_path = write_csv(fx.dir.path(), "movies.csv", csv);
    let mut options = fx.options(&csv_path);
    options.dry_run = true;

    let mut ignore = |_: PipelineEvent| {};
    let report = sync_catalog(&fx.omdb(), &http(), &options, &mut ignore).unwrap();
    assert!(!report.csv_written);
    assert_eq!(report.log.summary().planned, 1);
    assert_eq!(std::fs::read_to_string(&csv_path).unwrap(), csv);
    assert!(!fx.dir.path().join("images").exists());
}

#[test]
fn sync_missing_title_column_is_an_error() {
    let fx = SyncFixture::new();
    let csv_path = write_csv(fx.dir.path(), "movies.csv", "name,image_url\nHeat,\n");
    let options = fx.options(&csv_path);
    let mut ignore = |_: PipelineEvent| {};
    let err = sync_catalog(&fx.omdb(), &http(), &options, &mut ignore).unwrap_err();
    assert!(matches!(
        err,
        ScrapeError::Catalog(poster_fetch_core::CatalogError::MissingColumn(_))
    ));
}
