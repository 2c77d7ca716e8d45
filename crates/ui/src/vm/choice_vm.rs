use plan_core::model::{GOAL_CATALOG, GoalSelection, INTEREST_CATALOG, InterestSelection, RankedGoals};

/// One toggleable option on a multi-select screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChoiceRow {
    pub id: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankRow {
    pub index: usize,
    pub position: usize,
    pub label: &'static str,
    pub can_move_up: bool,
    pub can_move_down: bool,
}

#[must_use]
pub fn goal_rows(selection: &GoalSelection) -> Vec<ChoiceRow> {
    GOAL_CATALOG
        .iter()
        .map(|option| ChoiceRow {
            id: option.id,
            label: option.label,
            selected: selection.contains(option.id),
        })
        .collect()
}

#[must_use]
pub fn interest_rows(selection: &InterestSelection) -> Vec<ChoiceRow> {
    INTEREST_CATALOG
        .iter()
        .copied()
        .map(|interest| ChoiceRow {
            id: interest,
            label: interest,
            selected: selection.contains(interest),
        })
        .collect()
}

#[must_use]
pub fn rank_rows(ranking: &RankedGoals) -> Vec<RankRow> {
    let last = ranking.len().saturating_sub(1);
    ranking
        .labels()
        .enumerate()
        .map(|(index, label)| RankRow {
            index,
            position: index + 1,
            label,
            can_move_up: index > 0,
            can_move_down: index < last,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_rows_mark_selected_options() {
        let mut selection = GoalSelection::new();
        selection.toggle("plan-more").unwrap();
        let rows = goal_rows(&selection);
        assert_eq!(rows.len(), GOAL_CATALOG.len());
        let picked: Vec<_> = rows.iter().filter(|row| row.selected).map(|row| row.id).collect();
        assert_eq!(picked, ["plan-more"]);
    }

    #[test]
    fn rank_rows_disable_moves_at_the_edges() {
        let mut selection = GoalSelection::new();
        selection.toggle("reconnect").unwrap();
        selection.toggle("family-time").unwrap();
        selection.toggle("stay-in-touch").unwrap();
        let rows = rank_rows(&selection.into_ranking().unwrap());

        assert!(!rows[0].can_move_up);
        assert!(rows[0].can_move_down);
        assert!(rows[1].can_move_up && rows[1].can_move_down);
        assert!(!rows[2].can_move_down);
        assert_eq!(rows[2].position, 3);
    }
}
