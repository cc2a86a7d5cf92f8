use crate::error::{AppError, AppResult};
use server::model::Workspace;

/// Which workspaces a command applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every workspace the listing returned.
    All,
    /// Workspaces named by id, by name or as `owner/name`.
    Named(Vec<String>),
}

impl Selection {
    pub fn from_args(all: bool, names: Vec<String>) -> AppResult<Self> {
        match (all, names.is_empty()) {
            (true, true) => Ok(Selection::All),
            (true, false) => Err(AppError::Selection(
                "--all cannot be combined with explicit workspaces".to_string(),
            )),
            (false, true) => Err(AppError::Selection(
                "No workspaces selected. Name at least one workspace or pass --all".to_string(),
            )),
            (false, false) => Ok(Selection::Named(names)),
        }
    }

    /// Pick the selected workspaces out of `available`, keeping the order in
    /// which they were named and dropping repeats.
    ///
    /// Every name has to match exactly one workspace; nothing is dispatched
    /// for a partially resolvable or ambiguous selection.
    pub fn resolve(&self, available: &[Workspace]) -> AppResult<Vec<Workspace>> {
        let names = match self {
            Selection::All => return Ok(available.to_vec()),
            Selection::Named(names) => names,
        };

        let mut resolved: Vec<Workspace> = Vec::with_capacity(names.len());
        let mut unknown = Vec::new();

        for name in names {
            let candidates: Vec<&Workspace> =
                available.iter().filter(|w| matches(w, name)).collect();
            match candidates.as_slice() {
                [] => unknown.push(name.as_str()),
                [workspace] => {
                    if !resolved.iter().any(|r| r.id == workspace.id) {
                        resolved.push((*workspace).clone());
                    }
                }
                many => {
                    let paths: Vec<String> = many.iter().map(|w| w.display_name()).collect();
                    return Err(AppError::Selection(format!(
                        "Ambiguous workspace '{name}': {}",
                        paths.join(", ")
                    )));
                }
            }
        }

        if !unknown.is_empty() {
            return Err(AppError::Selection(format!(
                "Unknown workspace(s): {}",
                unknown.join(", ")
            )));
        }

        Ok(resolved)
    }
}

fn matches(workspace: &Workspace, name: &str) -> bool {
    workspace.id == name || workspace.name == name || workspace.display_name() == name
}

#[cfg(test)]
mod tests {
    use super::*;
    use server::model::WorkspaceBuild;
    use server::testing::workspaces;

    fn ids(selected: &[Workspace]) -> Vec<&str> {
        selected.iter().map(|w| w.id.as_str()).collect()
    }

    #[test]
    fn test_all_selects_everything() {
        let available = workspaces(&["a", "b", "c"]);
        let selected = Selection::All.resolve(&available).unwrap();
        assert_eq!(ids(&selected), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_named_matches_id_name_and_owner_path() {
        let available = workspaces(&["a", "b", "c"]);
        let selection = Selection::Named(vec![
            "c".to_string(),
            "ws-a".to_string(),
            "tester/ws-b".to_string(),
        ]);

        let selected = selection.resolve(&available).unwrap();
        assert_eq!(ids(&selected), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_repeated_names_resolve_once() {
        let available = workspaces(&["a", "b"]);
        let selection = Selection::Named(vec!["a".to_string(), "ws-a".to_string()]);

        let selected = selection.resolve(&available).unwrap();
        assert_eq!(ids(&selected), vec!["a"]);
    }

    #[test]
    fn test_unknown_names_are_reported_together() {
        let available = workspaces(&["a"]);
        let selection = Selection::Named(vec![
            "x".to_string(),
            "a".to_string(),
            "y".to_string(),
        ]);

        let error = selection.resolve(&available).unwrap_err();
        assert_eq!(
            error,
            AppError::Selection("Unknown workspace(s): x, y".to_string())
        );
    }

    #[test]
    fn test_name_shared_by_two_owners_is_ambiguous() {
        let available = vec![
            Workspace::new("id-alice", "dev", "alice", WorkspaceBuild::new("tv-1")),
            Workspace::new("id-bob", "dev", "bob", WorkspaceBuild::new("tv-2")),
        ];

        let error = Selection::Named(vec!["dev".to_string()])
            .resolve(&available)
            .unwrap_err();
        assert_eq!(
            error,
            AppError::Selection("Ambiguous workspace 'dev': alice/dev, bob/dev".to_string())
        );

        let selected = Selection::Named(vec!["bob/dev".to_string()])
            .resolve(&available)
            .unwrap();
        assert_eq!(ids(&selected), vec!["id-bob"]);
    }

    #[test]
    fn test_all_over_empty_listing_is_empty() {
        let selected = Selection::All.resolve(&[]).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_from_args() {
        assert_eq!(Selection::from_args(true, vec![]).unwrap(), Selection::All);
        assert_eq!(
            Selection::from_args(false, vec!["a".to_string()]).unwrap(),
            Selection::Named(vec!["a".to_string()])
        );
        assert!(matches!(
            Selection::from_args(false, vec![]),
            Err(AppError::Selection(_))
        ));
        assert!(matches!(
            Selection::from_args(true, vec!["a".to_string()]),
            Err(AppError::Selection(_))
        ));
    }
}
