//! Random Forest - Victim-presence ensemble
//!
//! Binary CART trees (Gini), mean leaf fraction over trees = P(viable presence).
//! Feature space là categorical nên split chỉ xét ngưỡng giữa hai code liên tiếp.
//!
//! Deterministic: cùng dataset + cùng ForestConfig ⇒ cùng forest (ChaCha8 seeded per tree).

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use crate::logic::dataset::TrainingSet;
use crate::logic::error::{Stage, TriageError};
use crate::logic::features::{vector::check_code, FEATURE_CARDINALITY, FEATURE_COUNT};

/// Split must improve impurity by more than this
const MIN_GAIN: f64 = 1e-12;

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub seed: u64,
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Features sampled per split; None = sqrt(FEATURE_COUNT)
    pub max_features: Option<usize>,
    pub bootstrap: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 50,
            seed: 42,
            max_depth: 16,
            min_samples_split: 2,
            max_features: None,
            bootstrap: false,
        }
    }
}

impl ForestConfig {
    pub fn validate(&self) -> Result<(), TriageError> {
        if self.n_trees == 0 {
            return Err(TriageError::Config("forest needs at least one tree".to_string()));
        }
        if self.max_depth == 0 {
            return Err(TriageError::Config("max_depth must be at least 1".to_string()));
        }
        if self.min_samples_split < 2 {
            return Err(TriageError::Config("min_samples_split must be at least 2".to_string()));
        }
        if let Some(m) = self.max_features {
            if m == 0 || m > FEATURE_COUNT {
                return Err(TriageError::Config(format!(
                    "max_features must be within 1..={}, got {}",
                    FEATURE_COUNT, m
                )));
            }
        }
        Ok(())
    }

    pub fn features_per_split(&self) -> usize {
        self.max_features
            .unwrap_or_else(|| ((FEATURE_COUNT as f64).sqrt().floor() as usize).max(1))
    }
}

// ============================================================================
// TREE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// `x[feature] <= threshold` goes left
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    /// Counts kept as integers so the probability survives persistence exactly
    Leaf { positives: u32, total: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Root at index 0, children always after their parent
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    pub fn predict(&self, x: &[f32]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Split { feature, threshold, left, right } => {
                    index = if x[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { positives, total } => {
                    return *positives as f64 / *total as f64;
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match &nodes[index] {
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
                Node::Leaf { .. } => 0,
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf { .. })).count()
    }
}

// ============================================================================
// FOREST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub config: ForestConfig,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit on a labeled training set
    pub fn fit(data: &TrainingSet, config: &ForestConfig) -> Result<Self, TriageError> {
        config.validate()?;

        if data.is_empty() {
            return Err(TriageError::Training("training set is empty".to_string()));
        }

        let codes = to_codes(data)?;
        let labels: &[u8] = &data.labels;

        let mut trees = Vec::with_capacity(config.n_trees);
        for t in 0..config.n_trees {
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(t as u64));

            let rows: Vec<usize> = if config.bootstrap {
                (0..data.len()).map(|_| rng.gen_range(0..data.len())).collect()
            } else {
                (0..data.len()).collect()
            };

            let mut builder = TreeBuilder {
                codes: &codes,
                labels,
                config,
                rng,
                nodes: Vec::new(),
            };
            builder.build(rows, 0);

            let tree = DecisionTree { nodes: builder.nodes };
            debug!("Tree {}: depth {}, {} leaves", t, tree.depth(), tree.leaf_count());
            trees.push(tree);
        }

        info!(
            "Random forest trained: {} trees on {} rows ({} positive)",
            trees.len(),
            data.len(),
            data.positives()
        );

        Ok(Self {
            config: config.clone(),
            trees,
        })
    }

    /// Mean positive fraction over trees
    pub fn predict_proba(&self, x: &[f32]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict(x)).sum();
        sum / self.trees.len() as f64
    }

    /// Structural check after deserialization
    ///
    /// Feature index ngoài layout là schema drift (fatal); hỏng cấu trúc khác là artifact corrupt.
    pub fn check_structure(&self, source: &str) -> Result<(), TriageError> {
        let corrupt = |reason: String| TriageError::ModelLoad {
            path: source.to_string(),
            reason,
        };

        if self.trees.is_empty() {
            return Err(corrupt("forest has no trees".to_string()));
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(corrupt(format!("tree {} has no nodes", t)));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Split { feature, left, right, .. } => {
                        if *feature >= FEATURE_COUNT {
                            return Err(TriageError::ModelSchemaMismatch {
                                stage: Stage::ModelLoad,
                                context: format!("tree {} node {}", t, i),
                                expected: format!("feature index < {}", FEATURE_COUNT),
                                actual: feature.to_string(),
                            });
                        }
                        let n = tree.nodes.len();
                        if *left <= i || *right <= i || *left >= n || *right >= n {
                            return Err(corrupt(format!("tree {} node {} has bad child links", t, i)));
                        }
                    }
                    Node::Leaf { positives, total } => {
                        if *total == 0 || positives > total {
                            return Err(corrupt(format!("tree {} node {} has bad leaf counts", t, i)));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// TREE BUILDER
// ============================================================================

fn to_codes(data: &TrainingSet) -> Result<Vec<[u8; FEATURE_COUNT]>, TriageError> {
    let mut codes = Vec::with_capacity(data.len());
    for (r, row) in data.features.outer_iter().enumerate() {
        let mut cell = [0u8; FEATURE_COUNT];
        for (i, v) in row.iter().enumerate() {
            check_code(i, *v).map_err(|e| TriageError::Training(format!("row {}: {}", r, e)))?;
            cell[i] = *v as u8;
        }
        codes.push(cell);
    }
    Ok(codes)
}

fn gini(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    2.0 * p * (1.0 - p)
}

struct Candidate {
    feature: usize,
    /// Rows with code <= cut go left
    cut: u8,
    gain: f64,
}

struct TreeBuilder<'a> {
    codes: &'a [[u8; FEATURE_COUNT]],
    labels: &'a [u8],
    config: &'a ForestConfig,
    rng: ChaCha8Rng,
    nodes: Vec<Node>,
}

impl<'a> TreeBuilder<'a> {
    fn build(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let total = rows.len();
        let positives = rows.iter().filter(|&&r| self.labels[r] == 1).count();

        let index = self.nodes.len();
        self.nodes.push(Node::Leaf {
            positives: positives as u32,
            total: total as u32,
        });

        let pure = positives == 0 || positives == total;
        if pure || depth >= self.config.max_depth || total < self.config.min_samples_split {
            return index;
        }

        let Some(best) = self.best_split(&rows, positives) else {
            return index;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| self.codes[r][best.feature] <= best.cut);

        let left = self.build(left_rows, depth + 1);
        let right = self.build(right_rows, depth + 1);

        self.nodes[index] = Node::Split {
            feature: best.feature,
            threshold: best.cut as f32 + 0.5,
            left,
            right,
        };
        index
    }

    /// Best split among a random feature subset; falls through to the rest when the subset has none
    fn best_split(&mut self, rows: &[usize], positives: usize) -> Option<Candidate> {
        let mut order: Vec<usize> = (0..FEATURE_COUNT).collect();
        order.shuffle(&mut self.rng);

        let k = self.config.features_per_split();
        let parent = gini(positives, rows.len());

        let (sampled, rest) = order.split_at(k);
        self.best_among(sampled, rows, parent)
            .or_else(|| self.best_among(rest, rows, parent))
    }

    fn best_among(&self, features: &[usize], rows: &[usize], parent: f64) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        let n = rows.len();

        for &feature in features {
            let cardinality = FEATURE_CARDINALITY[feature];
            // [code] -> (total, positives)
            let mut hist = vec![(0usize, 0usize); cardinality];
            for &r in rows {
                let code = self.codes[r][feature] as usize;
                hist[code].0 += 1;
                hist[code].1 += self.labels[r] as usize;
            }

            let (all_n, all_pos) = hist.iter().fold((0, 0), |acc, h| (acc.0 + h.0, acc.1 + h.1));
            let (mut left_n, mut left_pos) = (0usize, 0usize);

            for cut in 0..cardinality.saturating_sub(1) {
                left_n += hist[cut].0;
                left_pos += hist[cut].1;
                let right_n = all_n - left_n;
                if left_n == 0 || right_n == 0 {
                    continue;
                }

                let right_pos = all_pos - left_pos;
                let weighted = (left_n as f64 / n as f64) * gini(left_pos, left_n)
                    + (right_n as f64 / n as f64) * gini(right_pos, right_n);
                let gain = parent - weighted;

                if gain > MIN_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(Candidate {
                        feature,
                        cut: cut as u8,
                        gain,
                    });
                }
            }
        }

        best
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset::synthesize;
    use crate::logic::features::grid;
    use ndarray::Array2;

    fn small_config() -> ForestConfig {
        ForestConfig {
            n_trees: 8,
            ..ForestConfig::default()
        }
    }

    #[test]
    fn test_leaf_probability_matches_cell_fraction() {
        let data = synthesize(20).unwrap();
        let forest = RandomForest::fit(&data, &small_config()).unwrap();

        let responsive = [1.0, 3.0, 2.0, 2.0, 0.0, 2.0];
        assert!((forest.predict_proba(&responsive) - 0.55).abs() < 1e-9);

        let trapped = [1.0, 0.0, 3.0, 0.0, 0.0, 2.0];
        assert!((forest.predict_proba(&trapped) - 0.95).abs() < 1e-9);

        let empty = [0.0, 0.0, 0.0, 0.0, 0.0, 2.0];
        assert_eq!(forest.predict_proba(&empty), 0.0);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let data = synthesize(3).unwrap();
        let a = RandomForest::fit(&data, &small_config()).unwrap();
        let b = RandomForest::fit(&data, &small_config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_probabilities_in_unit_interval() {
        let data = synthesize(3).unwrap();
        let forest = RandomForest::fit(&data, &small_config()).unwrap();
        for cell in grid() {
            let p = forest.predict_proba(&cell);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_depth_respects_limit() {
        let data = synthesize(2).unwrap();
        let config = ForestConfig {
            n_trees: 2,
            max_depth: 3,
            ..ForestConfig::default()
        };
        let forest = RandomForest::fit(&data, &config).unwrap();
        assert!(forest.trees.iter().all(|t| t.depth() <= 3));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let data = synthesize(1).unwrap();
        let config = ForestConfig {
            n_trees: 0,
            ..ForestConfig::default()
        };
        assert!(matches!(RandomForest::fit(&data, &config), Err(TriageError::Config(_))));
    }

    #[test]
    fn test_single_class_dataset_gives_stumps() {
        let features = Array2::from_shape_vec((2, FEATURE_COUNT), vec![
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            1.0, 3.0, 3.0, 2.0, 2.0, 2.0,
        ]).unwrap();
        let data = TrainingSet::new(features, vec![0, 0]).unwrap();
        let forest = RandomForest::fit(&data, &small_config()).unwrap();
        assert!(forest.trees.iter().all(|t| t.nodes.len() == 1));
        assert_eq!(forest.predict_proba(&[1.0, 3.0, 3.0, 2.0, 2.0, 2.0]), 0.0);
    }

    #[test]
    fn test_structure_check_flags_foreign_feature_index() {
        let forest = RandomForest {
            config: ForestConfig::default(),
            trees: vec![DecisionTree {
                nodes: vec![
                    Node::Split { feature: 9, threshold: 0.5, left: 1, right: 2 },
                    Node::Leaf { positives: 0, total: 1 },
                    Node::Leaf { positives: 1, total: 1 },
                ],
            }],
        };
        assert!(matches!(
            forest.check_structure("model.json"),
            Err(TriageError::ModelSchemaMismatch { .. })
        ));

        let cyclic = RandomForest {
            config: ForestConfig::default(),
            trees: vec![DecisionTree {
                nodes: vec![Node::Split { feature: 0, threshold: 0.5, left: 0, right: 0 }],
            }],
        };
        assert!(matches!(
            cyclic.check_structure("model.json"),
            Err(TriageError::ModelLoad { .. })
        ));
    }
}
