//! Random image selection without short-term repeats.

use crate::{image_set, recency::RecencyBuffer, volatile_state::VolatileState};
use rand::{seq::IndexedRandom, Rng};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::sync::RwLock;

pub enum Selection<'a> {
    Picked(&'a str),
    /// Everything in the snapshot is in the recency buffer
    Exhausted,
}

/// Uniformly pick one of the names in `snapshot` that is not in `history`.
pub fn select_image<'a, R: Rng + ?Sized>(
    snapshot: &'a [String],
    history: &RecencyBuffer,
    rng: &mut R,
) -> Selection<'a> {
    let candidates: Vec<&'a str> = snapshot
        .iter()
        .map(String::as_str)
        .filter(|name| !history.contains(name))
        .collect();

    match candidates.choose(rng) {
        Some(name) => Selection::Picked(*name),
        None => Selection::Exhausted,
    }
}

#[derive(Debug, PartialEq)]
pub enum Pick {
    Image { name: String, path: PathBuf },
    /// The recency buffer has been reset; asking again will succeed if the folder has any images.
    Exhausted,
}

/// Pick an image from `dir` and record it as recently sent.
///
/// On exhaustion the whole recency buffer is cleared.  The write lock is held across listing and
/// selection, so concurrent picks are serialized.
pub async fn pick_image(dir: &Path, vstate: &RwLock<VolatileState>) -> io::Result<Pick> {
    let mut vstate = vstate.write().await;
    let snapshot = image_set::list(dir).await?;

    let picked = match select_image(&snapshot, &vstate.recent, &mut rand::rng()) {
        Selection::Picked(name) => name.to_owned(),
        Selection::Exhausted => {
            vstate.recent.clear();
            return Ok(Pick::Exhausted);
        }
    };

    vstate.recent.push(picked.clone());
    Ok(Pick::Image {
        path: dir.join(&picked),
        name: picked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use tempfile::TempDir;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn folder(files: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for file in files {
            std::fs::write(temp_dir.path().join(file), b"image").unwrap();
        }
        temp_dir
    }

    async fn picked_name(dir: &Path, vstate: &RwLock<VolatileState>) -> String {
        match pick_image(dir, vstate).await.unwrap() {
            Pick::Image { name, .. } => name,
            Pick::Exhausted => panic!("unexpected exhaustion"),
        }
    }

    #[test]
    fn test_select_never_returns_history() {
        let snapshot = names(&["a.png", "b.png", "c.png", "d.png"]);
        let mut history = RecencyBuffer::new(10);
        history.push("a.png");
        history.push("c.png");

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            match select_image(&snapshot, &history, &mut rng) {
                Selection::Picked(name) => assert!(name == "b.png" || name == "d.png"),
                Selection::Exhausted => panic!("candidates were available"),
            }
        }
    }

    #[test]
    fn test_select_reaches_every_candidate() {
        let snapshot = names(&["a.png", "b.png", "c.png"]);
        let history = RecencyBuffer::new(10);
        let mut rng = StdRng::seed_from_u64(42);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            if let Selection::Picked(name) = select_image(&snapshot, &history, &mut rng) {
                seen.insert(name);
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_select_exhausted() {
        let snapshot = names(&["a.png"]);
        let mut history = RecencyBuffer::new(10);
        history.push("a.png");
        let mut rng = StdRng::seed_from_u64(1);

        assert!(matches!(
            select_image(&snapshot, &history, &mut rng),
            Selection::Exhausted
        ));
        assert!(matches!(
            select_image(&[], &RecencyBuffer::new(10), &mut rng),
            Selection::Exhausted
        ));
    }

    #[tokio::test]
    async fn test_two_images_then_exhaustion() {
        let temp_dir = folder(&["a.png", "b.jpg"]);
        let vstate = RwLock::new(VolatileState::new(50));

        let first = picked_name(temp_dir.path(), &vstate).await;
        let second = picked_name(temp_dir.path(), &vstate).await;
        let mut both = vec![first.clone(), second.clone()];
        both.sort();
        assert_eq!(both, vec!["a.png", "b.jpg"]);
        assert!(vstate.read().await.recent.contains(&first));
        assert!(vstate.read().await.recent.contains(&second));

        let third = pick_image(temp_dir.path(), &vstate).await.unwrap();
        assert_eq!(third, Pick::Exhausted);
        assert!(vstate.read().await.recent.is_empty());

        // Retrying after the reset succeeds
        let fourth = picked_name(temp_dir.path(), &vstate).await;
        assert!(fourth == "a.png" || fourth == "b.jpg");
    }

    #[tokio::test]
    async fn test_history_keeps_last_picks_in_order() {
        let temp_dir = folder(&["1.png", "2.png", "3.png", "4.png", "5.png"]);
        let vstate = RwLock::new(VolatileState::new(2));

        let mut picks = Vec::new();
        for _ in 0..3 {
            picks.push(picked_name(temp_dir.path(), &vstate).await);
        }

        // No repeats were possible: 3 picks fit in 5 images even with a 2-entry history
        let vstate = vstate.read().await;
        assert_eq!(
            vstate.recent.iter().collect::<Vec<_>>(),
            vec![picks[1].as_str(), picks[2].as_str()]
        );
    }

    #[tokio::test]
    async fn test_pick_path_is_inside_folder() {
        let temp_dir = folder(&["only.gif", "skip.txt"]);
        let vstate = RwLock::new(VolatileState::new(50));

        let pick = pick_image(temp_dir.path(), &vstate).await.unwrap();
        assert_eq!(
            pick,
            Pick::Image {
                name: "only.gif".to_string(),
                path: temp_dir.path().join("only.gif"),
            }
        );
    }

    #[tokio::test]
    async fn test_empty_folder_reports_exhaustion() {
        let temp_dir = folder(&[]);
        let vstate = RwLock::new(VolatileState::new(50));

        assert_eq!(
            pick_image(temp_dir.path(), &vstate).await.unwrap(),
            Pick::Exhausted
        );
    }

    #[tokio::test]
    async fn test_read_failure_leaves_history_alone() {
        let temp_dir = folder(&[]);
        let vstate = RwLock::new(VolatileState::new(50));
        vstate.write().await.recent.push("a.png");

        assert!(pick_image(&temp_dir.path().join("gone"), &vstate)
            .await
            .is_err());
        assert_eq!(vstate.read().await.recent.len(), 1);
    }
}
