use serde::{Deserialize, Deserializer, Serialize};

/// Rows from a list endpoint.
///
/// The backend answers either with a bare array or with a paginated
/// `{"count": n, "results": [...]}` object; both decode to this.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub count: usize,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn into_results(self) -> Vec<T> {
        self.results
    }
}

impl<'de, T> Deserialize<'de> for Page<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Payload<T> {
            Paginated {
                count: Option<usize>,
                results: Vec<T>,
            },
            Plain(Vec<T>),
        }

        Ok(match Payload::deserialize(deserializer)? {
            Payload::Paginated { count, results } => Page {
                count: count.unwrap_or(results.len()),
                results,
            },
            Payload::Plain(results) => Page {
                count: results.len(),
                results,
            },
        })
    }
}
