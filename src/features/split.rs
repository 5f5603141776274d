//! Deterministic user-level train/test partition.

use anyhow::{Result, bail};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::info;

use crate::features::types::FeaturedRow;

/// Unique user identifiers in first-seen order.
pub fn unique_users(rows: &[FeaturedRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut users = Vec::new();
    for row in rows {
        if seen.insert(row.user_id.as_str()) {
            users.push(row.user_id.clone());
        }
    }
    users
}

/// Partitions rows into (train, test) by user identifier.
///
/// User ids are shuffled with a seeded RNG and the first `round(n ·
/// test_size)` users form the test side, so all rows of a user land in one
/// split and the same seed always produces the same partition. The train
/// side keeps at least one user whenever there are two or more.
pub fn split_train_test(
    rows: Vec<FeaturedRow>,
    test_size: f64,
    seed: u64,
) -> Result<(Vec<FeaturedRow>, Vec<FeaturedRow>)> {
    if !(0.0..1.0).contains(&test_size) {
        bail!("test_size must be in [0, 1), got {test_size}");
    }

    let mut users = unique_users(&rows);
    let total_users = users.len();

    let mut rng = SmallRng::seed_from_u64(seed);
    users.shuffle(&mut rng);

    let mut n_test = (total_users as f64 * test_size).round() as usize;
    if n_test == total_users && n_test > 0 {
        n_test -= 1;
    }

    let test_users: HashSet<&str> = users[..n_test].iter().map(String::as_str).collect();

    let mut train = Vec::new();
    let mut test = Vec::new();
    for row in rows {
        if test_users.contains(row.user_id.as_str()) {
            test.push(row);
        } else {
            train.push(row);
        }
    }

    info!(
        train_users = total_users - n_test,
        test_users = n_test,
        train_rows = train.len(),
        test_rows = test.len(),
        seed,
        "Train/test split complete"
    );

    Ok((train, test))
}
