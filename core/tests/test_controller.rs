use trailmap_core::{
    ControllerError, Coordinates, Cycling, FormInput, InteractionController, MapService,
    MemoryBlobStore, PersistenceBridge, Running, ValidationError, Workout, WorkoutKind,
    WorkoutStore, WorkoutView,
};

#[derive(Default)]
struct FakeView {
    renders: Vec<usize>,
    form_visible: bool,
    errors: Vec<String>,
}

impl WorkoutView for FakeView {
    fn render_list(&mut self, workouts: &[Workout]) {
        self.renders.push(workouts.len());
    }

    fn show_form(&mut self) {
        self.form_visible = true;
    }

    fn hide_form(&mut self) {
        self.form_visible = false;
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

#[derive(Default)]
struct FakeMap {
    markers: Vec<(Coordinates, String)>,
    centered: Vec<Coordinates>,
    clears: usize,
}

impl MapService for FakeMap {
    fn place_marker(&mut self, coordinates: Coordinates, label: &str) {
        self.markers.push((coordinates, label.to_string()));
    }

    fn center_on(&mut self, coordinates: Coordinates) {
        self.centered.push(coordinates);
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
        self.clears += 1;
    }
}

type TestController = InteractionController<FakeView, FakeMap, MemoryBlobStore>;

fn controller() -> TestController {
    InteractionController::new(
        FakeView::default(),
        FakeMap::default(),
        PersistenceBridge::new(MemoryBlobStore::new()),
    )
}

fn running_input<'a>() -> FormInput<'a> {
    FormInput {
        kind: WorkoutKind::Running,
        distance: "5.2",
        duration: "24",
        cadence_or_elevation: "178",
    }
}

#[test]
fn map_click_shows_form_and_submit_creates_running_workout() {
    let mut app = controller();
    app.startup();
    app.map_ready();

    app.map_click(Coordinates(39.0, -12.0));
    assert!(app.view().form_visible);

    app.submit(running_input()).expect("valid submit failed");

    assert_eq!(app.store().len(), 1);
    assert!(!app.view().form_visible);
    assert_eq!(app.map().markers.len(), 1);
    assert!(app.map().markers[0].1.contains("Running"));

    match &app.store().all()[0] {
        Workout::Running(run) => assert_eq!(run.pace_min_per_km(), 24.0 / 5.2),
        other => panic!("expected a running workout, got {other:?}"),
    }

    // Submission persisted the store.
    assert_eq!(app.bridge().load().unwrap().len(), 1);
}

#[test]
fn submit_creates_cycling_workout_with_elevation() {
    let mut app = controller();
    app.map_ready();
    app.map_click(Coordinates(39.0, -12.0));

    app.submit(FormInput {
        kind: WorkoutKind::Cycling,
        distance: "27",
        duration: "95",
        cadence_or_elevation: "525",
    })
    .expect("valid submit failed");

    match &app.store().all()[0] {
        Workout::Cycling(ride) => {
            assert_eq!(ride.elevation_gain_m(), 525.0);
            assert!((ride.speed_km_per_h() - 17.05).abs() < 0.01);
        }
        other => panic!("expected a cycling workout, got {other:?}"),
    }
}

#[test]
fn negative_distance_aborts_submission_without_mutation() {
    let mut app = controller();
    app.map_ready();
    app.map_click(Coordinates(39.0, -12.0));

    let err = app
        .submit(FormInput {
            distance: "-5",
            ..running_input()
        })
        .unwrap_err();

    assert!(matches!(
        err,
        ControllerError::Validation(ValidationError::NotPositive { field: "distance" })
    ));
    assert!(app.store().is_empty());
    assert!(app.map().markers.is_empty());
    assert!(app.bridge().load().unwrap().is_empty());
    assert_eq!(app.view().errors.len(), 1);
    // Form stays up so the user can correct the input.
    assert!(app.view().form_visible);
}

#[test]
fn non_numeric_field_is_a_validation_error() {
    let mut app = controller();
    app.map_ready();
    app.map_click(Coordinates(39.0, -12.0));

    let err = app
        .submit(FormInput {
            cadence_or_elevation: "fast",
            ..running_input()
        })
        .unwrap_err();

    assert!(matches!(
        err,
        ControllerError::Validation(ValidationError::NotANumber { field: "cadence" })
    ));
    assert!(app.store().is_empty());
}

#[test]
fn submit_without_a_map_click_is_rejected() {
    let mut app = controller();
    app.map_ready();

    let err = app.submit(running_input()).unwrap_err();
    assert!(matches!(err, ControllerError::NoPendingLocation));
    assert_eq!(app.view().errors.len(), 1);
}

#[test]
fn pending_coordinates_are_consumed_by_submission() {
    let mut app = controller();
    app.map_ready();
    app.map_click(Coordinates(39.0, -12.0));
    app.submit(running_input()).unwrap();

    // A second submit needs a fresh click.
    let err = app.submit(running_input()).unwrap_err();
    assert!(matches!(err, ControllerError::NoPendingLocation));
    assert_eq!(app.store().len(), 1);
}

#[test]
fn cancel_form_hides_and_discards_the_pending_click() {
    let mut app = controller();
    app.map_ready();
    app.map_click(Coordinates(39.0, -12.0));
    app.cancel_form();

    assert!(!app.view().form_visible);
    assert!(matches!(
        app.submit(running_input()),
        Err(ControllerError::NoPendingLocation)
    ));
}

#[test]
fn startup_rehydrates_the_store_and_map_ready_places_markers() {
    let mut seeded = WorkoutStore::new();
    seeded.add(
        Running::new(Coordinates(1.0, 2.0), 5.2, 24.0, 178.0)
            .unwrap()
            .into(),
    );
    seeded.add(
        Cycling::new(Coordinates(3.0, 4.0), 27.0, 95.0, 525.0)
            .unwrap()
            .into(),
    );

    let mut bridge = PersistenceBridge::new(MemoryBlobStore::new());
    bridge.save(&seeded).unwrap();

    let mut app = InteractionController::new(FakeView::default(), FakeMap::default(), bridge);
    app.startup();

    assert_eq!(app.store().len(), 2);
    assert_eq!(app.view().renders, vec![2]);
    // Markers wait for the map.
    assert!(app.map().markers.is_empty());

    app.map_ready();
    assert_eq!(app.map().markers.len(), 2);
    assert_eq!(app.map().markers[1].0, Coordinates(3.0, 4.0));
}

#[test]
fn startup_with_corrupt_blob_degrades_to_an_empty_store() {
    use trailmap_core::{BlobStore, STORAGE_KEY};

    let mut blob = MemoryBlobStore::new();
    blob.set(STORAGE_KEY, "{not json".to_string()).unwrap();

    let mut app = InteractionController::new(
        FakeView::default(),
        FakeMap::default(),
        PersistenceBridge::new(blob),
    );
    app.startup();

    assert!(app.store().is_empty());
    assert_eq!(app.view().renders, vec![0]);
}

#[test]
fn delete_persists_and_rerenders_in_place() {
    let mut app = controller();
    app.map_ready();
    app.map_click(Coordinates(1.0, 2.0));
    app.submit(running_input()).unwrap();
    app.map_click(Coordinates(3.0, 4.0));
    app.submit(running_input()).unwrap();

    let doomed = app.store().all()[0].id().to_string();
    app.delete(&doomed);

    assert_eq!(app.store().len(), 1);
    assert!(app.store().find_by_id(&doomed).is_none());
    assert_eq!(app.bridge().load().unwrap().len(), 1);
    // List and markers were rebuilt from the updated store, no reload.
    assert_eq!(app.view().renders.last(), Some(&1));
    assert_eq!(app.map().clears, 1);
    assert_eq!(app.map().markers.len(), 1);
    assert_eq!(app.map().markers[0].0, Coordinates(3.0, 4.0));
}

#[test]
fn delete_of_unknown_id_is_a_silent_no_op() {
    let mut app = controller();
    app.map_ready();
    app.map_click(Coordinates(1.0, 2.0));
    app.submit(running_input()).unwrap();

    let renders_before = app.view().renders.len();
    app.delete("no-such-id");

    assert_eq!(app.store().len(), 1);
    assert_eq!(app.view().renders.len(), renders_before);
    assert!(app.view().errors.is_empty());
}

#[test]
fn focus_centers_the_map_on_the_workout() {
    let mut app = controller();
    app.map_ready();
    app.map_click(Coordinates(39.0, -12.0));
    app.submit(running_input()).unwrap();

    let id = app.store().all()[0].id().to_string();
    app.focus(&id);
    assert_eq!(app.map().centered, vec![Coordinates(39.0, -12.0)]);

    app.focus("no-such-id");
    assert_eq!(app.map().centered.len(), 1);
}

#[test]
fn reset_clears_storage_store_and_markers() {
    let mut app = controller();
    app.map_ready();
    app.map_click(Coordinates(39.0, -12.0));
    app.submit(running_input()).unwrap();

    app.reset();

    assert!(app.store().is_empty());
    assert!(app.bridge().load().unwrap().is_empty());
    assert!(app.map().markers.is_empty());
    assert_eq!(app.view().renders.last(), Some(&0));
}
