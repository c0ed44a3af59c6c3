use crate::models::{Habit, HabitStatus};

/// Group label for habits that carry no tags.
pub const UNTAGGED: &str = "untagged";

/// Selects habits by lifecycle status while keeping the stored order.
/// With no status added, `build` returns the whole list unchanged.
pub struct HabitListBuilder<'a> {
    habits: &'a [Habit],
    statuses: Vec<HabitStatus>,
}

impl<'a> HabitListBuilder<'a> {
    pub fn new(habits: &'a [Habit]) -> Self {
        Self {
            habits,
            statuses: Vec::new(),
        }
    }

    pub fn status(mut self, status: HabitStatus) -> Self {
        self.statuses.push(status);
        self
    }

    pub fn build(self) -> Vec<Habit> {
        self.habits
            .iter()
            .filter(|habit| self.statuses.is_empty() || self.statuses.contains(&habit.status))
            .cloned()
            .collect()
    }
}

/// Groups habits by each tag they carry, in first-seen tag order.
/// A habit with several tags appears under each of them; a habit with
/// none lands in the [`UNTAGGED`] group. Within a group the input order
/// is preserved.
pub fn group_by_tags(habits: &[Habit]) -> Vec<(String, Vec<Habit>)> {
    let mut groups: Vec<(String, Vec<Habit>)> = Vec::new();
    for habit in habits {
        if habit.tags.is_empty() {
            push_into(&mut groups, UNTAGGED, habit);
        } else {
            for tag in &habit.tags {
                push_into(&mut groups, tag, habit);
            }
        }
    }
    groups
}

fn push_into(groups: &mut Vec<(String, Vec<Habit>)>, tag: &str, habit: &Habit) {
    if let Some((_, members)) = groups.iter_mut().find(|(name, _)| name == tag) {
        members.push(habit.clone());
    } else {
        groups.push((tag.to_string(), vec![habit.clone()]));
    }
}
