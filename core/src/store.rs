use crate::models::Workout;

/// In-memory ordered collection of workouts. Insertion order is chronological
/// order of creation; removal preserves the order of the remainder.
#[derive(Debug, Default)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a workout. Id uniqueness is the caller's responsibility
    /// (ids come from the models' generator, which never repeats in-process).
    pub fn add(&mut self, workout: Workout) {
        self.workouts.push(workout);
    }

    /// Removes and returns the workout with the given id.
    /// `None` means the id was unknown and nothing changed.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Workout> {
        let index = self.workouts.iter().position(|w| w.id() == id)?;
        Some(self.workouts.remove(index))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    /// Read-only snapshot in insertion order, for rendering and persistence.
    pub fn all(&self) -> &[Workout] {
        &self.workouts
    }

    /// Wholesale rehydration; any prior contents are dropped.
    pub fn replace_all(&mut self, workouts: Vec<Workout>) {
        self.workouts = workouts;
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }
}
