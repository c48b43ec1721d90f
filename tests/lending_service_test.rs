//! Lending service unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use libris::domain::{Book, BorrowRecord, BorrowStatus, NewBook, User, UserRole};
use libris::errors::AppError;
use libris::infra::{MockBookRepository, MockLoanRepository, MockUserRepository, MockUnitOfWork};
use libris::services::{LendingManager, LendingService};

fn test_book(id: Uuid, total: i32, available: i32) -> Book {
    Book {
        id,
        title: "Clean Code".to_string(),
        author: "Robert C. Martin".to_string(),
        isbn: "9780132350884".to_string(),
        publisher: "Prentice Hall".to_string(),
        year: 2008,
        total_count: total,
        available_count: available,
        is_available: available > 0,
        category: Some("Software".to_string()),
    }
}

fn test_user(id: Uuid) -> User {
    User {
        id,
        username: "reader".to_string(),
        password_hash: "hashed".to_string(),
        role: UserRole::User,
    }
}

/// Wire repository mocks into a unit-of-work mock.
fn uow_with(
    books: Option<MockBookRepository>,
    users: Option<MockUserRepository>,
    loans: Option<MockLoanRepository>,
) -> MockUnitOfWork {
    let mut uow = MockUnitOfWork::new();
    if let Some(books) = books {
        let books = Arc::new(books);
        uow.expect_books().returning(move || books.clone());
    }
    if let Some(users) = users {
        let users = Arc::new(users);
        uow.expect_users().returning(move || users.clone());
    }
    if let Some(loans) = loans {
        let loans = Arc::new(loans);
        uow.expect_loans().returning(move || loans.clone());
    }
    uow
}

#[tokio::test]
async fn borrow_decrements_available_count_by_one() {
    let book_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_book(id, 2, 2))));

    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|id| Ok(Some(test_user(id))));

    let mut loans = MockLoanRepository::new();
    loans.expect_find_open().returning(|_, _| Ok(None));

    let mut uow = uow_with(Some(books), Some(users), Some(loans));
    uow.expect_create_loan()
        .withf(move |book, record| {
            book.available_count == 1
                && book.is_available
                && record.book_id == book.id
                && record.status == BorrowStatus::Borrowed
                && record.return_date.is_none()
        })
        .returning(|_, record| Ok(record));

    let service = LendingManager::new(Arc::new(uow));
    let record = service.borrow_book(book_id, user_id).await.unwrap();

    assert!(record.is_open());
    assert_eq!(record.user_id, user_id);
}

#[tokio::test]
async fn borrowing_the_last_copy_clears_the_available_flag() {
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_book(id, 2, 1))));

    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|id| Ok(Some(test_user(id))));

    let mut loans = MockLoanRepository::new();
    loans.expect_find_open().returning(|_, _| Ok(None));

    let mut uow = uow_with(Some(books), Some(users), Some(loans));
    uow.expect_create_loan()
        .withf(|book, _| book.available_count == 0 && !book.is_available)
        .returning(|_, record| Ok(record));

    let service = LendingManager::new(Arc::new(uow));
    assert!(service
        .borrow_book(Uuid::new_v4(), Uuid::new_v4())
        .await
        .is_ok());
}

#[tokio::test]
async fn borrow_fails_out_of_stock_without_persisting() {
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_book(id, 2, 0))));

    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|id| Ok(Some(test_user(id))));

    // No create_loan expectation: any write attempt fails the test.
    let uow = uow_with(Some(books), Some(users), None);

    let service = LendingManager::new(Arc::new(uow));
    let result = service.borrow_book(Uuid::new_v4(), Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::OutOfStock));
}

#[tokio::test]
async fn borrow_fails_when_pair_already_has_open_record() {
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_book(id, 2, 2))));

    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|id| Ok(Some(test_user(id))));

    let mut loans = MockLoanRepository::new();
    loans
        .expect_find_open()
        .returning(|book_id, user_id| Ok(Some(BorrowRecord::open(book_id, user_id, Utc::now()))));

    let uow = uow_with(Some(books), Some(users), Some(loans));

    let service = LendingManager::new(Arc::new(uow));
    let result = service.borrow_book(Uuid::new_v4(), Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::AlreadyBorrowed));
}

#[tokio::test]
async fn borrow_fails_when_book_is_missing() {
    let mut books = MockBookRepository::new();
    books.expect_find_by_id().returning(|_| Ok(None));

    let uow = uow_with(Some(books), None, None);

    let service = LendingManager::new(Arc::new(uow));
    let result = service.borrow_book(Uuid::new_v4(), Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn borrow_fails_when_user_is_missing() {
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_book(id, 2, 2))));

    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));

    let uow = uow_with(Some(books), Some(users), None);

    let service = LendingManager::new(Arc::new(uow));
    let result = service.borrow_book(Uuid::new_v4(), Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn return_increments_available_count_and_closes_the_record() {
    let book_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let mut loans = MockLoanRepository::new();
    loans
        .expect_find_by_id()
        .returning(move |_| Ok(Some(BorrowRecord::open(book_id, user_id, Utc::now()))));

    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_book(id, 2, 1))));

    let mut uow = uow_with(Some(books), None, Some(loans));
    uow.expect_close_loan()
        .withf(|book, record| {
            book.available_count == 2
                && book.is_available
                && record.status == BorrowStatus::Returned
                && record.return_date.is_some()
        })
        .returning(|_, record| Ok(record));

    let service = LendingManager::new(Arc::new(uow));
    let record = service.return_book(Uuid::new_v4()).await.unwrap();

    assert!(!record.is_open());
}

#[tokio::test]
async fn returning_a_returned_record_fails_without_persisting() {
    let mut loans = MockLoanRepository::new();
    loans.expect_find_by_id().returning(|_| {
        let record = BorrowRecord::open(Uuid::new_v4(), Uuid::new_v4(), Utc::now());
        Ok(Some(record.close(Utc::now()).unwrap()))
    });

    let uow = uow_with(None, None, Some(loans));

    let service = LendingManager::new(Arc::new(uow));
    let result = service.return_book(Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::AlreadyReturned));
}

#[tokio::test]
async fn returning_a_missing_record_is_not_found() {
    let mut loans = MockLoanRepository::new();
    loans.expect_find_by_id().returning(|_| Ok(None));

    let uow = uow_with(None, None, Some(loans));

    let service = LendingManager::new(Arc::new(uow));
    let result = service.return_book(Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn two_copies_borrow_until_out_of_stock_then_return() {
    let book_id = Uuid::new_v4();
    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();
    let user_c = Uuid::new_v4();

    // Shared state stands in for the database so the scenario can run
    // as one sequence.
    let book_state = Arc::new(Mutex::new(test_book(book_id, 2, 2)));
    let records: Arc<Mutex<HashMap<Uuid, BorrowRecord>>> = Arc::new(Mutex::new(HashMap::new()));

    let mut books = MockBookRepository::new();
    {
        let state = book_state.clone();
        books
            .expect_find_by_id()
            .returning(move |_| Ok(Some(state.lock().unwrap().clone())));
    }

    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|id| Ok(Some(test_user(id))));

    let mut loans = MockLoanRepository::new();
    {
        let records = records.clone();
        loans.expect_find_open().returning(move |book_id, user_id| {
            Ok(records
                .lock()
                .unwrap()
                .values()
                .find(|r| r.book_id == book_id && r.user_id == user_id && r.is_open())
                .cloned())
        });
    }
    {
        let records = records.clone();
        loans
            .expect_find_by_id()
            .returning(move |id| Ok(records.lock().unwrap().get(&id).cloned()));
    }

    let mut uow = uow_with(Some(books), Some(users), Some(loans));
    {
        let state = book_state.clone();
        let records = records.clone();
        uow.expect_create_loan().returning(move |book, record| {
            *state.lock().unwrap() = book;
            records.lock().unwrap().insert(record.id, record.clone());
            Ok(record)
        });
    }
    {
        let state = book_state.clone();
        let records = records.clone();
        uow.expect_close_loan().returning(move |book, record| {
            *state.lock().unwrap() = book;
            records.lock().unwrap().insert(record.id, record.clone());
            Ok(record)
        });
    }

    let service = LendingManager::new(Arc::new(uow));

    let record_a = service.borrow_book(book_id, user_a).await.unwrap();
    {
        let book = book_state.lock().unwrap();
        assert_eq!(book.available_count, 1);
        assert!(book.is_available);
    }

    service.borrow_book(book_id, user_b).await.unwrap();
    {
        let book = book_state.lock().unwrap();
        assert_eq!(book.available_count, 0);
        assert!(!book.is_available);
    }

    let result = service.borrow_book(book_id, user_c).await;
    assert!(matches!(result.unwrap_err(), AppError::OutOfStock));
    assert_eq!(book_state.lock().unwrap().available_count, 0);

    service.return_book(record_a.id).await.unwrap();
    {
        let book = book_state.lock().unwrap();
        assert_eq!(book.available_count, 1);
        assert!(book.is_available);
    }
    assert!(!records.lock().unwrap()[&record_a.id].is_open());
}

#[tokio::test]
async fn delete_book_with_open_records_is_a_conflict() {
    let mut loans = MockLoanRepository::new();
    loans.expect_has_open_for_book().returning(|_| Ok(true));

    let uow = uow_with(None, None, Some(loans));

    let service = LendingManager::new(Arc::new(uow));
    let result = service.delete_book(Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn delete_missing_book_returns_false() {
    let mut loans = MockLoanRepository::new();
    loans.expect_has_open_for_book().returning(|_| Ok(false));

    let mut books = MockBookRepository::new();
    books.expect_delete().returning(|_| Ok(false));

    let uow = uow_with(Some(books), None, Some(loans));

    let service = LendingManager::new(Arc::new(uow));
    assert!(!service.delete_book(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn add_book_with_duplicate_isbn_is_a_conflict() {
    let mut books = MockBookRepository::new();
    books.expect_exists_by_isbn().returning(|_| Ok(true));

    let uow = uow_with(Some(books), None, None);

    let service = LendingManager::new(Arc::new(uow));
    let result = service
        .add_book(NewBook {
            title: "T".into(),
            author: "A".into(),
            isbn: "123".into(),
            publisher: "P".into(),
            year: 2024,
            total_count: 1,
            category: None,
        })
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn add_book_starts_fully_available() {
    let mut books = MockBookRepository::new();
    books.expect_exists_by_isbn().returning(|_| Ok(false));
    books.expect_insert().returning(|book| Ok(book));

    let uow = uow_with(Some(books), None, None);

    let service = LendingManager::new(Arc::new(uow));
    let book = service
        .add_book(NewBook {
            title: "T".into(),
            author: "A".into(),
            isbn: "123".into(),
            publisher: "P".into(),
            year: 2024,
            total_count: 3,
            category: None,
        })
        .await
        .unwrap();

    assert_eq!(book.available_count, 3);
    assert!(book.is_available);
}

#[tokio::test]
async fn update_book_rejects_counts_out_of_range() {
    let book_id = Uuid::new_v4();

    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .returning(move |id| Ok(Some(test_book(id, 2, 1))));

    let uow = uow_with(Some(books), None, None);

    let mut edited = test_book(book_id, 2, 1);
    edited.available_count = 5;

    let service = LendingManager::new(Arc::new(uow));
    let result = service.update_book(edited).await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn statistics_reflect_repository_counts() {
    let mut books = MockBookRepository::new();
    books.expect_count().returning(|| Ok(10));
    books.expect_count_available().returning(|| Ok(7));

    let mut loans = MockLoanRepository::new();
    loans.expect_count().returning(|| Ok(25));
    loans.expect_count_open().returning(|| Ok(4));

    let uow = uow_with(Some(books), None, Some(loans));
    let service = LendingManager::new(Arc::new(uow));

    let book_stats = service.book_statistics().await.unwrap();
    assert_eq!(book_stats.total_titles, 10);
    assert_eq!(book_stats.available_titles, 7);
    assert_eq!(book_stats.open_loans, 4);

    let loan_stats = service.loan_statistics().await.unwrap();
    assert_eq!(loan_stats.total, 25);
    assert_eq!(loan_stats.open, 4);
    assert_eq!(loan_stats.returned, 21);
}

#[tokio::test]
async fn loan_statistics_tolerate_counts_racing_between_queries() {
    // The total and open counts are separate queries; records opened in
    // between can make open exceed total. The returned count must clamp
    // to zero instead of underflowing.
    let mut loans = MockLoanRepository::new();
    loans.expect_count().returning(|| Ok(3));
    loans.expect_count_open().returning(|| Ok(5));

    let uow = uow_with(None, None, Some(loans));
    let service = LendingManager::new(Arc::new(uow));

    let stats = service.loan_statistics().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.open, 5);
    assert_eq!(stats.returned, 0);
}
