use seatalloc::core::assignment::{AssignmentManager, SeatSeed, Violation};
use seatalloc::core::model::{EmployeeUpdate, NewEmployee, SeatRef, SeatStatus};
use seatalloc::core::store::Store;
use seatalloc::core::{config, db};
use rusqlite::Connection;
use std::fs;
use tempfile::tempdir;

fn vacant(ids: &[&str]) -> Vec<SeatSeed> {
    ids.iter()
        .map(|id| SeatSeed {
            id: id.to_string(),
            status: SeatStatus::Vacant,
        })
        .collect()
}

fn employee(id: i64, seat: &str) -> NewEmployee {
    NewEmployee {
        id,
        name: format!("Employee {}", id),
        role: "Engineer".to_string(),
        department: "R&D".to_string(),
        seat: SeatRef::parse(seat),
    }
}

fn update(seat: &str) -> EmployeeUpdate {
    EmployeeUpdate {
        name: "Moved".to_string(),
        role: "Engineer".to_string(),
        department: "R&D".to_string(),
        seat: Some(SeatRef::parse(seat)),
    }
}

#[test]
fn test_invariants_hold_across_mixed_operations() {
    let tmp = tempdir().unwrap();
    let mgr = AssignmentManager::open(&Store::new(tmp.path()), 5).unwrap();
    mgr.seed_seats(&vacant(&["A1", "A2", "A3", "B1"])).unwrap();

    mgr.create_employee(employee(1, "A1")).unwrap();
    mgr.create_employee(employee(2, "A2")).unwrap();
    mgr.create_employee(employee(3, "Work From Home")).unwrap();
    let _ = mgr.create_employee(employee(4, "A1")).unwrap_err();
    mgr.update_employee(3, update("A3")).unwrap();
    mgr.update_employee(1, update("B1")).unwrap();
    let _ = mgr.update_employee(2, update("A3")).unwrap_err();
    mgr.update_employee(2, update("Unassigned")).unwrap();
    mgr.delete_employee(3).unwrap();
    mgr.create_employee(employee(5, "A1")).unwrap();

    let report = mgr.check_consistency().unwrap();
    assert!(report.consistent, "{:?}", report.violations);
    assert_eq!(report.seats_checked, 4);
    assert_eq!(report.employees_checked, 3);

    for seat in mgr.list_seats().unwrap() {
        assert!(seat.is_consistent(), "{:?}", seat);
    }
    let occupied: Vec<(String, Option<i64>)> = mgr
        .list_seats_by_status(SeatStatus::Occupied)
        .unwrap()
        .into_iter()
        .map(|s| (s.id, s.employee_id))
        .collect();
    assert_eq!(
        occupied,
        vec![("A1".to_string(), Some(5)), ("B1".to_string(), Some(1))]
    );
}

#[test]
fn test_check_consistency_reports_and_delete_heals_corruption() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    let mgr = AssignmentManager::open(&store, 5).unwrap();
    mgr.seed_seats(&vacant(&["A1", "A2"])).unwrap();
    mgr.create_employee(employee(1, "A1")).unwrap();

    // Point the employee elsewhere behind the manager's back.
    let conn = Connection::open(store.db_path()).unwrap();
    conn.execute("UPDATE employees SET seat_id = 'A2' WHERE employeeid = 1", [])
        .unwrap();

    let report = mgr.check_consistency().unwrap();
    assert!(!report.consistent);
    assert!(report.violations.contains(&Violation::OccupantPointsElsewhere {
        seat: "A1".to_string(),
        employee_id: 1,
        employee_seat: "A2".to_string(),
    }));
    assert!(report.violations.iter().any(|v| matches!(
        v,
        Violation::SeatNotHeld { employee_id: 1, seat, status: SeatStatus::Vacant, occupant: None } if seat == "A2"
    )));

    // Release follows the occupant, so A1 is freed even though the ref says A2.
    mgr.delete_employee(1).unwrap();
    assert_eq!(mgr.seat_detail("A1").unwrap().status, SeatStatus::Vacant);
    assert!(mgr.check_consistency().unwrap().consistent);
}

#[test]
fn test_create_reclaims_orphaned_seat() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    let mgr = AssignmentManager::open(&store, 5).unwrap();
    mgr.seed_seats(&vacant(&["A1", "A2"])).unwrap();
    mgr.create_employee(employee(7, "A1")).unwrap();

    let conn = Connection::open(store.db_path()).unwrap();
    conn.execute("DELETE FROM employees WHERE employeeid = 7", [])
        .unwrap();
    assert!(!mgr.check_consistency().unwrap().consistent);

    mgr.create_employee(employee(7, "A2")).unwrap();
    assert_eq!(mgr.seat_detail("A1").unwrap().status, SeatStatus::Vacant);
    assert_eq!(mgr.seat_detail("A2").unwrap().employee_id, Some(7));
    assert!(mgr.check_consistency().unwrap().consistent);
}

#[test]
fn test_initialize_is_idempotent_and_survives_reopen() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path().join("nested").join("data"));
    db::initialize_seats_db(&store, 5).unwrap();
    db::initialize_seats_db(&store, 5).unwrap();
    assert!(store.db_path().exists());

    {
        let mgr = AssignmentManager::open(&store, 5).unwrap();
        mgr.seed_seats(&vacant(&["A1"])).unwrap();
        mgr.create_employee(employee(1, "A1")).unwrap();
    }
    let reopened = AssignmentManager::open(&store, 5).unwrap();
    let alice = reopened.get_employee(1).unwrap().unwrap();
    assert_eq!(alice.seat, SeatRef::Seat("A1".to_string()));
}

#[test]
fn test_config_file_drives_store_location() {
    let tmp = tempdir().unwrap();
    let project = tmp.path();
    fs::create_dir_all(project.join(".seatalloc")).unwrap();
    fs::write(
        config::config_path(project),
        "[store]\nroot = \"seat-data\"\nbusy_timeout_secs = 9\n",
    )
    .unwrap();

    let cfg = config::load_config(project).unwrap();
    assert_eq!(cfg.store.busy_timeout_secs, 9);
    let override_root = tmp.path().join("elsewhere");
    let store = cfg.resolve_store(project, Some(&override_root));
    assert_eq!(store.root, override_root);
}
