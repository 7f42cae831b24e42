use aathoos_core::{
    Database, NewStudySession, RepoError, SqliteStudySessionRepository, StudySessionRepository,
    ValidationError,
};

#[test]
fn create_and_get_roundtrip() {
    let db = Database::open_in_memory().unwrap();
    let repo = SqliteStudySessionRepository::new(&db);

    let created = repo
        .create(&NewStudySession::new("chemistry", 1_800).with_notes("titration lab"))
        .unwrap();
    assert_eq!(created.duration_secs, 1_800);
    assert_eq!(created.started_at, created.created_at - 1_800);
    assert_eq!(created.notes.as_deref(), Some("titration lab"));

    assert_eq!(repo.get(created.id).unwrap(), Some(created));
}

#[test]
fn create_validates_subject_and_duration() {
    let db = Database::open_in_memory().unwrap();
    let repo = SqliteStudySessionRepository::new(&db);

    assert!(matches!(
        repo.create(&NewStudySession::new("  ", 60)),
        Err(RepoError::Validation(ValidationError::EmptyField("subject")))
    ));
    assert!(matches!(
        repo.create(&NewStudySession::new("math", -1)),
        Err(RepoError::Validation(ValidationError::NegativeDuration(-1)))
    ));
    assert!(repo.create(&NewStudySession::new("math", 0)).is_ok());
}

#[test]
fn total_duration_sums_only_matching_subject() {
    let db = Database::open_in_memory().unwrap();
    let repo = SqliteStudySessionRepository::new(&db);

    repo.create(&NewStudySession::new("math", 60)).unwrap();
    repo.create(&NewStudySession::new("math", 90)).unwrap();
    repo.create(&NewStudySession::new("science", 30)).unwrap();

    assert_eq!(repo.total_duration("math").unwrap(), 150);
    assert_eq!(repo.total_duration("science").unwrap(), 30);
}

#[test]
fn total_duration_without_matches_is_zero() {
    let db = Database::open_in_memory().unwrap();
    let repo = SqliteStudySessionRepository::new(&db);

    assert_eq!(repo.total_duration("history").unwrap(), 0);
}

#[test]
fn lists_are_ordered_by_start_time() {
    let db = Database::open_in_memory().unwrap();
    let repo = SqliteStudySessionRepository::new(&db);

    let short = repo.create(&NewStudySession::new("math", 60)).unwrap();
    let long = repo.create(&NewStudySession::new("math", 3_600)).unwrap();
    let other = repo.create(&NewStudySession::new("art", 600)).unwrap();

    let all: Vec<_> = repo.list_all().unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(all, [long.id, other.id, short.id]);

    let math: Vec<_> = repo
        .list_by_subject("math")
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(math, [long.id, short.id]);
}

#[test]
fn delete_removes_session_from_totals() {
    let db = Database::open_in_memory().unwrap();
    let repo = SqliteStudySessionRepository::new(&db);

    let first = repo.create(&NewStudySession::new("math", 60)).unwrap();
    repo.create(&NewStudySession::new("math", 90)).unwrap();

    assert!(repo.delete(first.id).unwrap());
    assert!(repo.get(first.id).unwrap().is_none());
    assert!(!repo.delete(first.id).unwrap());
    assert_eq!(repo.total_duration("math").unwrap(), 90);
}
