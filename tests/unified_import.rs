use std::collections::HashSet;
use std::sync::Mutex;

use staff_import::ImportError;
use staff_import::ingestion::{
    ImportFormat, ImportOptions, UploadedFile, import_employees, import_from_path,
};
use staff_import::store::{EmployeeStore, InMemoryEmployeeStore, StoreError};
use staff_import::types::{Employee, NewEmployee};

const VALID_CSV: &str = "nome,email,time,mesEntrada,fabrica,senioridade,cargo,modelo\n\
Ana,ana@x.com,Core Banking,Março,Interno,Junior,Dev BackEnd,PJ\n\
Bia,bia@x.com,Pagamentos,Abril,Externo,Pleno,QA,CLT\n";

/// Records every batch it is handed; assigns ids like a real store.
#[derive(Default)]
struct RecordingStore {
    calls: Mutex<Vec<usize>>,
    inner: InMemoryEmployeeStore,
}

impl EmployeeStore for RecordingStore {
    fn save_all(&self, batch: Vec<NewEmployee>) -> Result<Vec<Employee>, StoreError> {
        self.calls.lock().unwrap().push(batch.len());
        self.inner.save_all(batch)
    }
}

#[test]
fn import_fixture_skips_short_row_and_keeps_file_order() {
    let store = InMemoryEmployeeStore::new();
    let saved = import_from_path("tests/fixtures/employees.csv", &store, &ImportOptions::default())
        .unwrap();

    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].record.nome, "Ana");
    assert_eq!(saved[1].record.nome, "Carla");
    assert_eq!(saved[1].record.email, "carla@x.com");
    assert_ne!(saved[0].id, saved[1].id);
    assert_eq!(store.len().unwrap(), 2);
}

#[test]
fn import_carriage_return_only_csv_upload() {
    let store = InMemoryEmployeeStore::new();
    let saved = import_employees(
        &UploadedFile::new("mac.csv", VALID_CSV.replace('\n', "\r")),
        &store,
        &ImportOptions::default(),
    )
    .unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[1].record.modelo, "CLT");
}

#[test]
fn import_header_only_csv_has_no_valid_records() {
    let store = RecordingStore::default();
    let err = import_from_path("tests/fixtures/header_only.csv", &store, &ImportOptions::default())
        .unwrap_err();

    assert!(matches!(
        err,
        ImportError::NoValidRecords {
            format: ImportFormat::Csv
        }
    ));
    assert_eq!(err.to_string(), "no valid employee records found in the CSV file");
    assert!(store.calls.lock().unwrap().is_empty());
}

#[test]
fn unsupported_filenames_fail_before_reading() {
    let store = RecordingStore::default();
    // Valid CSV content under names that are not recognized.
    for name in ["funcionarios.txt", "funcionarios.csv.txt", "funcionarios", "dados.ods"] {
        let err = import_employees(
            &UploadedFile::new(name, VALID_CSV),
            &store,
            &ImportOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat { .. }), "{name}");
        assert!(err.to_string().contains(".csv, .xls or .xlsx"));
    }

    let err = import_employees(
        &UploadedFile::unnamed(VALID_CSV),
        &store,
        &ImportOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat { filename: None }));
    assert!(store.calls.lock().unwrap().is_empty());
}

#[test]
fn uppercase_extension_is_accepted() {
    let store = InMemoryEmployeeStore::new();
    let saved = import_employees(
        &UploadedFile::new("FUNCIONARIOS.CSV", VALID_CSV),
        &store,
        &ImportOptions::default(),
    )
    .unwrap();
    assert_eq!(saved.len(), 2);
}

#[test]
fn format_override_skips_detection() {
    let store = InMemoryEmployeeStore::new();
    let opts = ImportOptions {
        format: Some(ImportFormat::Csv),
        ..Default::default()
    };
    let saved = import_employees(&UploadedFile::unnamed(VALID_CSV), &store, &opts).unwrap();
    assert_eq!(saved.len(), 2);
}

#[test]
fn three_row_csv_with_one_short_row_persists_two_in_order() {
    let csv = "h\n\
Ana,ana@x.com,Core,Março,Interno,Junior,QA,PJ\n\
Bruno,bruno@x.com,Core,Abril,Externo\n\
Carla,carla@x.com,Core,Maio,Interno,Senior,QA,CLT\n";
    let store = RecordingStore::default();
    let saved = import_employees(
        &UploadedFile::new("f.csv", csv),
        &store,
        &ImportOptions::default(),
    )
    .unwrap();

    let names: Vec<&str> = saved.iter().map(|e| e.record.nome.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Carla"]);
    assert_eq!(saved[0].id, 1);
    assert_eq!(saved[1].id, 2);
    // One bulk call for the whole batch.
    assert_eq!(*store.calls.lock().unwrap(), vec![2]);
}

#[test]
fn reimport_creates_independent_records() {
    let store = InMemoryEmployeeStore::permissive();
    let file = UploadedFile::new("f.csv", VALID_CSV);

    let first = import_employees(&file, &store, &ImportOptions::default()).unwrap();
    let second = import_employees(&file, &store, &ImportOptions::default()).unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    let ids: HashSet<u64> = first.iter().chain(&second).map(|e| e.id).collect();
    assert_eq!(ids.len(), 4);
    assert_eq!(first[0].record, second[0].record);
    assert_eq!(store.len().unwrap(), 4);
}

#[test]
fn store_rejection_is_import_failure_and_persists_nothing() {
    let store = InMemoryEmployeeStore::new();
    let file = UploadedFile::new("f.csv", VALID_CSV);
    import_employees(&file, &store, &ImportOptions::default()).unwrap();

    let err = import_employees(&file, &store, &ImportOptions::default()).unwrap_err();
    assert!(matches!(err, ImportError::ImportFailure { .. }));
    assert!(err.to_string().contains("duplicate email 'ana@x.com'"));
    assert_eq!(store.len().unwrap(), 2);
}

#[test]
fn duplicate_emails_within_one_file_reject_the_batch() {
    let csv = "h\n\
Ana,ana@x.com,Core,Março,Interno,Junior,QA,PJ\n\
Ana Maria,ana@x.com,Core,Abril,Interno,Pleno,QA,CLT\n";
    let store = InMemoryEmployeeStore::new();
    let err = import_employees(&UploadedFile::new("f.csv", csv), &store, &ImportOptions::default())
        .unwrap_err();
    assert!(matches!(err, ImportError::ImportFailure { .. }));
    assert!(store.is_empty().unwrap());
}

#[test]
fn missing_file_is_read_failure() {
    let store = InMemoryEmployeeStore::new();
    let err = import_from_path("tests/fixtures/does_not_exist.csv", &store, &ImportOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ImportError::ReadFailure {
            format: ImportFormat::Csv,
            ..
        }
    ));
}

#[test]
fn store_returning_wrong_count_is_import_failure() {
    struct LossyStore;

    impl EmployeeStore for LossyStore {
        fn save_all(&self, batch: Vec<NewEmployee>) -> Result<Vec<Employee>, StoreError> {
            Ok(batch.into_iter().take(1).map(|r| r.with_id(9)).collect())
        }
    }

    let err = import_employees(
        &UploadedFile::new("f.csv", VALID_CSV),
        &LossyStore,
        &ImportOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ImportError::ImportFailure { .. }));
}
