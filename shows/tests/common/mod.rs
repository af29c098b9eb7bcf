use shows::{Show, ShowId, ShowRepository, StorageError};
use time::macros::date;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Generates one `#[tokio::test]` per repository property. `$setup` is an
/// async fn building a fresh repository and `$teardown` releases it once the
/// property holds. Extra attributes such as `#[ignore]` go on every test.
macro_rules! repository_contract {
    (@test $setup:path, $teardown:path, [$(#[$attr:meta])*], $name:ident) => {
        #[tokio::test]
        $(#[$attr])*
        async fn $name() {
            common::init_tracing();
            let repository = $setup().await;
            common::$name(&repository).await;
            $teardown(repository).await;
        }
    };
    (@tests $setup:path, $teardown:path, $attrs:tt) => {};
    (@tests $setup:path, $teardown:path, $attrs:tt, $name:ident $(, $rest:ident)*) => {
        repository_contract!(@test $setup, $teardown, $attrs, $name);
        repository_contract!(@tests $setup, $teardown, $attrs $(, $rest)*);
    };
    ($setup:path, $teardown:path $(, #[$attr:meta])* $(,)?) => {
        repository_contract!(@tests $setup, $teardown, [$(#[$attr])*],
            missing_id_is_none,
            insert_assigns_id_and_round_trips,
            zero_show_id_from_json_is_inserted,
            update_keeps_id_and_persists_changes,
            update_of_unknown_id_returns_false,
            find_all_lists_every_show,
            empty_name_matches_everything,
            name_search_ignores_case,
            name_search_treats_wildcards_literally,
            genre_search_is_exact,
            delete_removes_show,
            delete_of_unknown_id_returns_false,
            ids_are_not_reused_after_delete,
            invalid_show_is_not_saved
        );
    };
}

async fn insert(repository: &impl ShowRepository, show: Show) -> Show {
    let mut show = show;
    assert!(repository.save(&mut show).await.unwrap());
    show
}

fn names(shows: &[Show]) -> Vec<&str> {
    shows.iter().map(|show| show.name.as_str()).collect()
}

pub async fn missing_id_is_none(repository: &impl ShowRepository) {
    let id = ShowId::new(424242).unwrap();
    assert_eq!(repository.find_by_id(id).await.unwrap(), None);
}

pub async fn insert_assigns_id_and_round_trips(repository: &impl ShowRepository) {
    let original = Show::new("Breaking Bad", "Crime")
        .with_description("A dying man starts cooking meth.")
        .with_premiere_date(date!(2008 - 01 - 20));

    let mut show = original.clone();
    assert!(repository.save(&mut show).await.unwrap());

    let id = show.id.expect("save should assign an id");
    let found = repository.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(
        found,
        Show {
            id: Some(id),
            ..original
        }
    );
}

pub async fn zero_show_id_from_json_is_inserted(repository: &impl ShowRepository) {
    let mut show: Show =
        serde_json::from_str(r#"{"showId":0,"name":"Fargo","genre":"Crime"}"#).unwrap();
    assert!(show.is_new());

    assert!(repository.save(&mut show).await.unwrap());
    let id = show.id.expect("save should assign an id");
    assert_ne!(id.get(), 0);

    let found = repository.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.name, "Fargo");
    assert_eq!(repository.find_all().await.unwrap().len(), 1);
}

pub async fn update_keeps_id_and_persists_changes(repository: &impl ShowRepository) {
    let saved = insert(repository, Show::new("Lost", "Drama")).await;
    let id = saved.id.unwrap();

    let mut fetched = repository.find_by_id(id).await.unwrap().unwrap();
    fetched.genre = "Mystery".into();
    assert!(repository.save(&mut fetched).await.unwrap());
    assert_eq!(fetched.id, Some(id));

    let updated = repository.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(updated.genre, "Mystery");
    assert_eq!(updated.name, "Lost");
    assert_eq!(repository.find_all().await.unwrap().len(), 1);
}

pub async fn update_of_unknown_id_returns_false(repository: &impl ShowRepository) {
    let mut ghost = Show {
        id: ShowId::new(9999),
        ..Show::new("Ghost", "Horror")
    };

    assert!(!repository.save(&mut ghost).await.unwrap());
    assert!(repository.find_all().await.unwrap().is_empty());
}

pub async fn find_all_lists_every_show(repository: &impl ShowRepository) {
    assert!(repository.find_all().await.unwrap().is_empty());

    insert(repository, Show::new("Dark", "Sci-Fi")).await;
    insert(repository, Show::new("Fargo", "Crime")).await;

    let all = repository.find_all().await.unwrap();
    assert_eq!(names(&all), ["Dark", "Fargo"]);
}

pub async fn empty_name_matches_everything(repository: &impl ShowRepository) {
    insert(repository, Show::new("Dark", "Sci-Fi")).await;
    insert(repository, Show::new("Fargo", "Crime")).await;

    let matched = repository.find_by_name("").await.unwrap();
    assert_eq!(matched, repository.find_all().await.unwrap());
}

pub async fn name_search_ignores_case(repository: &impl ShowRepository) {
    insert(repository, Show::new("The Office", "Comedy")).await;
    insert(repository, Show::new("Office Space Stories", "Comedy")).await;
    insert(repository, Show::new("Parks and Recreation", "Comedy")).await;

    let matched = repository.find_by_name("oFFice").await.unwrap();
    assert_eq!(names(&matched), ["The Office", "Office Space Stories"]);

    assert!(repository.find_by_name("sopranos").await.unwrap().is_empty());
}

pub async fn name_search_treats_wildcards_literally(repository: &impl ShowRepository) {
    insert(repository, Show::new("100% Hotter", "Reality")).await;
    insert(repository, Show::new("1000 Ways to Die", "Documentary")).await;
    insert(repository, Show::new("snake_case", "Comedy")).await;
    insert(repository, Show::new("snakeXcase", "Comedy")).await;

    let percent = repository.find_by_name("0%").await.unwrap();
    assert_eq!(names(&percent), ["100% Hotter"]);

    let underscore = repository.find_by_name("e_c").await.unwrap();
    assert_eq!(names(&underscore), ["snake_case"]);
}

pub async fn genre_search_is_exact(repository: &impl ShowRepository) {
    insert(repository, Show::new("Mad Men", "Drama")).await;
    insert(repository, Show::new("Glee", "Drama Comedy")).await;
    insert(repository, Show::new("Euphoria", "drama")).await;

    let matched = repository.find_by_genre("Drama").await.unwrap();
    assert_eq!(names(&matched), ["Mad Men"]);

    assert!(repository.find_by_genre("Dram").await.unwrap().is_empty());
    assert!(repository.find_by_genre("Western").await.unwrap().is_empty());
}

pub async fn delete_removes_show(repository: &impl ShowRepository) {
    let saved = insert(repository, Show::new("Firefly", "Sci-Fi")).await;
    let id = saved.id.unwrap();

    assert!(repository.delete_by_id(id).await.unwrap());
    assert_eq!(repository.find_by_id(id).await.unwrap(), None);
    assert!(!repository.delete_by_id(id).await.unwrap());
}

pub async fn delete_of_unknown_id_returns_false(repository: &impl ShowRepository) {
    let id = ShowId::new(31337).unwrap();
    assert!(!repository.delete_by_id(id).await.unwrap());
}

pub async fn ids_are_not_reused_after_delete(repository: &impl ShowRepository) {
    let first = insert(repository, Show::new("Deadwood", "Western")).await;
    repository.delete_by_id(first.id.unwrap()).await.unwrap();

    let second = insert(repository, Show::new("Westworld", "Western")).await;
    assert_ne!(first.id, second.id);
}

pub async fn invalid_show_is_not_saved(repository: &impl ShowRepository) {
    let mut show = Show::new("", "Drama");

    let err = repository.save(&mut show).await.unwrap_err();
    assert!(matches!(err, StorageError::Invalid(_)), "{err:?}");
    assert!(show.is_new());
    assert!(repository.find_all().await.unwrap().is_empty());
}
