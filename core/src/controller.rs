use crate::errors::{ControllerError, ValidationError};
use crate::models::{Coordinates, Cycling, Running, Workout, WorkoutKind};
use crate::storage::{BlobStore, PersistenceBridge};
use crate::store::WorkoutStore;

/// List/form surface the controller drives. Rendering itself happens in the
/// host; the controller only says what to show.
pub trait WorkoutView {
    fn render_list(&mut self, workouts: &[Workout]);
    fn show_form(&mut self);
    fn hide_form(&mut self);
    fn show_error(&mut self, message: &str);
}

/// Map widget surface: markers and view centering.
pub trait MapService {
    fn place_marker(&mut self, coordinates: Coordinates, label: &str);
    fn center_on(&mut self, coordinates: Coordinates);
    fn clear_markers(&mut self);
}

/// Raw field values as submitted, before numeric coercion. `cadence_or_elevation`
/// carries cadence for running and elevation gain for cycling.
#[derive(Debug, Clone, Copy)]
pub struct FormInput<'a> {
    pub kind: WorkoutKind,
    pub distance: &'a str,
    pub duration: &'a str,
    pub cadence_or_elevation: &'a str,
}

#[derive(Debug, Clone, Copy)]
enum FormState {
    Hidden,
    Shown { coordinates: Coordinates },
}

fn parse_field(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber { field })?;
    if !value.is_finite() {
        return Err(ValidationError::NotANumber { field });
    }
    Ok(value)
}

/// Event-driven glue between the injected view, map and persistence bridge.
/// The host calls one method per user event; all state lives here.
///
/// Persistence failures degrade gracefully: they are logged and the user
/// action completes against the in-memory store.
pub struct InteractionController<V, M, B> {
    view: V,
    map: M,
    bridge: PersistenceBridge<B>,
    store: WorkoutStore,
    form: FormState,
    map_ready: bool,
}

impl<V: WorkoutView, M: MapService, B: BlobStore> InteractionController<V, M, B> {
    pub fn new(view: V, map: M, bridge: PersistenceBridge<B>) -> Self {
        Self {
            view,
            map,
            bridge,
            store: WorkoutStore::new(),
            form: FormState::Hidden,
            map_ready: false,
        }
    }

    /// Rehydrates the store from persistence and renders the list. Markers
    /// wait for `map_ready`.
    pub fn startup(&mut self) {
        let workouts = self.bridge.load_or_empty();
        self.store.replace_all(workouts);
        self.view.render_list(self.store.all());
    }

    /// One-shot map-ready signal; places a marker per stored workout.
    pub fn map_ready(&mut self) {
        self.map_ready = true;
        for workout in self.store.all() {
            self.map
                .place_marker(workout.coordinates(), &workout.marker_label());
        }
    }

    /// A click on the map captures the coordinates and shows the form.
    pub fn map_click(&mut self, coordinates: Coordinates) {
        self.form = FormState::Shown { coordinates };
        self.view.show_form();
    }

    pub fn cancel_form(&mut self) {
        self.form = FormState::Hidden;
        self.view.hide_form();
    }

    /// Validates the submitted fields and, on success, creates the workout at
    /// the pending click coordinates, renders it, hides the form and persists.
    /// Any invalid field aborts the whole submission with nothing mutated;
    /// the error is also pushed to the view.
    pub fn submit(&mut self, input: FormInput<'_>) -> Result<(), ControllerError> {
        match self.try_submit(input) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.view.show_error(&err.to_string());
                Err(err)
            }
        }
    }

    fn try_submit(&mut self, input: FormInput<'_>) -> Result<(), ControllerError> {
        let FormState::Shown { coordinates } = self.form else {
            return Err(ControllerError::NoPendingLocation);
        };

        let distance = parse_field("distance", input.distance)?;
        let duration = parse_field("duration", input.duration)?;

        let workout: Workout = match input.kind {
            WorkoutKind::Running => {
                let cadence = parse_field("cadence", input.cadence_or_elevation)?;
                Running::new(coordinates, distance, duration, cadence)?.into()
            }
            WorkoutKind::Cycling => {
                let elevation = parse_field("elevation", input.cadence_or_elevation)?;
                Cycling::new(coordinates, distance, duration, elevation)?.into()
            }
        };

        log::info!("new {} workout {}", workout.kind().label(), workout.id());
        if self.map_ready {
            self.map
                .place_marker(workout.coordinates(), &workout.marker_label());
        }
        self.store.add(workout);
        self.view.render_list(self.store.all());
        self.view.hide_form();
        self.form = FormState::Hidden;
        self.persist();
        Ok(())
    }

    /// Removes the workout, persists, and re-renders list and markers in
    /// place from the updated store. Unknown ids are a silent no-op.
    pub fn delete(&mut self, id: &str) {
        match self.store.remove_by_id(id) {
            Some(removed) => {
                log::info!("deleted workout {}", removed.id());
                self.persist();
                self.view.render_list(self.store.all());
                self.refresh_markers();
            }
            None => log::debug!("delete: no workout with id '{id}'"),
        }
    }

    /// Centers the map on a workout picked from the list. Unknown ids and a
    /// not-yet-ready map are no-ops.
    pub fn focus(&mut self, id: &str) {
        if !self.map_ready {
            return;
        }
        if let Some(workout) = self.store.find_by_id(id) {
            let coordinates = workout.coordinates();
            self.map.center_on(coordinates);
        }
    }

    /// Drops the persisted blob and all in-memory workouts, then re-renders.
    pub fn reset(&mut self) {
        if let Err(err) = self.bridge.clear() {
            log::warn!("could not clear stored workouts: {err}");
        }
        self.store.replace_all(Vec::new());
        self.view.render_list(self.store.all());
        self.refresh_markers();
    }

    fn refresh_markers(&mut self) {
        if !self.map_ready {
            return;
        }
        self.map.clear_markers();
        for workout in self.store.all() {
            self.map
                .place_marker(workout.coordinates(), &workout.marker_label());
        }
    }

    fn persist(&mut self) {
        if let Err(err) = self.bridge.save(&self.store) {
            log::warn!("could not persist workouts: {err}");
        }
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn bridge(&self) -> &PersistenceBridge<B> {
        &self.bridge
    }
}
