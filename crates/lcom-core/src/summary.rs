use serde::{Deserialize, Serialize};

/// One scored class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassScore {
    pub name: String,
    pub score: usize,
}

/// A scored batch, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub algorithm: String,
    pub classes: Vec<ClassScore>,
    pub average: f64,
}

/// Aggregate per-class scores into a summary, sorted by class name.
/// The average is 0 for an empty batch.
pub fn summarize(algorithm: &str, mut classes: Vec<ClassScore>) -> Summary {
    classes.sort_by(|a, b| a.name.cmp(&b.name));
    let average = if classes.is_empty() {
        0.0
    } else {
        classes.iter().map(|c| c.score).sum::<usize>() as f64 / classes.len() as f64
    };
    Summary {
        algorithm: algorithm.to_string(),
        classes,
        average,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(name: &str, score: usize) -> ClassScore {
        ClassScore {
            name: name.to_string(),
            score,
        }
    }

    #[test]
    fn test_empty_batch_averages_zero() {
        let summary = summarize("LCOM4", vec![]);
        assert_eq!(summary.average, 0.0);
        assert!(summary.classes.is_empty());
    }

    #[test]
    fn test_average_over_scores() {
        let summary = summarize("LCOM4", vec![score("a.A", 1), score("a.B", 2)]);
        assert_eq!(summary.average, 1.5);
    }

    #[test]
    fn test_classes_sorted_by_name() {
        let summary = summarize("LCOM4", vec![score("b.B", 2), score("a.A", 1)]);
        let names: Vec<&str> = summary.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a.A", "b.B"]);
    }
}
