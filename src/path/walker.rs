//! Resolution of a field path against a concrete [`Value`].
//!
//! The walker reports one [`Context`] per resolved leaf. Keys or indices that
//! cannot be resolved are reported as well, at the deepest point reached, so
//! callers can tell a missing field from a malformed container.

use log::trace;
use serde::Serialize;

use super::segment::{Index, Path, SegmentKind};
use crate::value::Value;

/// Resolution outcome of one traversal branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The terminal segment resolved to a value (possibly null).
    Found,
    /// The container had the expected shape but lacked the key or index.
    ElementNotFound,
    /// A container along the path was missing or had the wrong shape.
    ParentNotFound,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Outcome::Found => "found",
            Outcome::ElementNotFound => "element not found",
            Outcome::ParentNotFound => "parent not found",
        };
        f.write_str(text)
    }
}

/// A single observation produced by [`Path::walk`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Context<'a> {
    /// The resolved value, absent unless `outcome` is `Found`.
    pub value: Option<&'a Value>,
    /// The container the last lookup was attempted in.
    #[serde(skip)]
    pub parent: Option<&'a Value>,
    /// The path with indices bound to the elements visited on this branch.
    pub path: Path,
    /// Last key consulted, empty when the last hop was a sequence index.
    pub name: String,
    /// Last sequence index consulted.
    pub index: Option<usize>,
    pub outcome: Outcome,
}

impl Context<'_> {
    pub fn is_found(&self) -> bool {
        self.outcome == Outcome::Found
    }
}

/// How the walker reached the value it is currently positioned on.
#[derive(Clone, Copy)]
struct Hop<'p, 'v> {
    parent: Option<&'v Value>,
    name: Option<&'p str>,
    index: Option<usize>,
}

impl<'p, 'v> Hop<'p, 'v> {
    fn root() -> Self {
        Hop {
            parent: None,
            name: None,
            index: None,
        }
    }

    fn element(parent: &'v Value, index: Option<usize>) -> Self {
        Hop {
            parent: Some(parent),
            name: None,
            index,
        }
    }
}

impl Path {
    /// Resolves this path against `data`, calling `observe` once per match.
    ///
    /// The walk runs on a private copy of the path, so a single parsed path can
    /// be walked repeatedly or from several threads at once.
    pub fn walk<'v, F>(&self, data: &'v Value, mut observe: F)
    where
        F: FnMut(Context<'v>),
    {
        let mut template = self.clone();
        template.bind_all_wildcards();

        let mut walker = Walker {
            root: &template,
            bound: Vec::new(),
        };
        walker.step(&mut observe, &template, 0, data, Hop::root());
    }

    /// Walks `data` and collects every observation.
    pub fn contexts<'v>(&self, data: &'v Value) -> Vec<Context<'v>> {
        let mut contexts = Vec::new();
        self.walk(data, |context| contexts.push(context));
        contexts
    }
}

struct Walker<'p> {
    root: &'p Path,
    /// Wildcard iterations in progress, as (segment depth, element index).
    bound: Vec<(usize, usize)>,
}

impl<'p> Walker<'p> {
    fn step<'v, F>(
        &mut self,
        observe: &mut F,
        segment: &'p Path,
        depth: usize,
        current: &'v Value,
        hop: Hop<'p, 'v>,
    ) where
        F: FnMut(Context<'v>),
    {
        let (target, hop) = match segment.name() {
            Some(key) => match current {
                Value::Mapping(map) => (
                    map.get(key),
                    Hop {
                        parent: Some(current),
                        name: Some(key),
                        index: None,
                    },
                ),
                _ => {
                    let hop = Hop {
                        parent: Some(current),
                        name: Some(key),
                        index: None,
                    };
                    self.emit(observe, Outcome::ParentNotFound, None, hop, self.snapshot());
                    return;
                }
            },
            None => (Some(current), hop),
        };

        let next = match (segment.kind, segment.next()) {
            (SegmentKind::Element, _) | (_, None) => {
                let outcome = match target {
                    Some(_) => Outcome::Found,
                    None => Outcome::ElementNotFound,
                };
                self.emit(observe, outcome, target, hop, self.snapshot());
                return;
            }
            (_, Some(next)) => next,
        };

        let Some(container) = target else {
            self.emit(observe, Outcome::ParentNotFound, None, hop, self.snapshot());
            return;
        };

        match (segment.kind, container) {
            (SegmentKind::Object, Value::Mapping(_)) => {
                self.step(observe, next, depth + 1, container, hop);
            }
            (SegmentKind::Array(index), Value::Sequence(items)) => {
                self.step_array(observe, index, next, depth, container, items);
            }
            _ => {
                // The value exists but is not the container the path expects.
                let path = self.truncated(self.snapshot(), depth + 1);
                self.emit(observe, Outcome::ParentNotFound, None, hop, path);
            }
        }
    }

    fn step_array<'v, F>(
        &mut self,
        observe: &mut F,
        index: Index,
        next: &'p Path,
        depth: usize,
        sequence: &'v Value,
        items: &'v [Value],
    ) where
        F: FnMut(Context<'v>),
    {
        match index {
            Index::Bound(i) => match items.get(i) {
                Some(item) => {
                    self.step(observe, next, depth + 1, item, Hop::element(sequence, Some(i)))
                }
                None => self.emit(
                    observe,
                    Outcome::ElementNotFound,
                    None,
                    Hop::element(sequence, Some(i)),
                    self.snapshot(),
                ),
            },
            Index::Wildcard | Index::Unbound if items.is_empty() => {
                let mut path = self.snapshot();
                if let Some(slot) = path.nth_mut(depth) {
                    slot.kind = SegmentKind::Array(Index::Unbound);
                }
                let hop = Hop::element(sequence, None);
                // An empty outer dimension is reported against the container.
                if next.kind == SegmentKind::Element {
                    self.emit(observe, Outcome::ElementNotFound, None, hop, path);
                } else {
                    let path = self.truncated(path, depth + 2);
                    self.emit(observe, Outcome::ParentNotFound, None, hop, path);
                }
            }
            Index::Wildcard | Index::Unbound => {
                for (i, item) in items.iter().enumerate() {
                    self.bound.push((depth, i));
                    self.step(observe, next, depth + 1, item, Hop::element(sequence, Some(i)));
                    self.bound.pop();
                }
            }
        }
    }

    /// Copies the template with the indices bound on the current branch.
    fn snapshot(&self) -> Path {
        let mut path = self.root.clone();
        for &(depth, i) in &self.bound {
            if let Some(segment) = path.nth_mut(depth) {
                segment.kind = SegmentKind::Array(Index::Bound(i));
            }
        }
        path
    }

    fn truncated(&self, path: Path, n: usize) -> Path {
        match path.truncate(n) {
            Some(truncated) => truncated,
            None => path,
        }
    }

    fn emit<'v, F>(
        &self,
        observe: &mut F,
        outcome: Outcome,
        value: Option<&'v Value>,
        hop: Hop<'p, 'v>,
        path: Path,
    ) where
        F: FnMut(Context<'v>),
    {
        trace!("walk {} -> {}", path, outcome);
        observe(Context {
            value,
            parent: hop.parent,
            path,
            name: hop.name.unwrap_or_default().to_string(),
            index: hop.index,
            outcome,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse;
    use serde_json::json;

    fn value(json: serde_json::Value) -> Value {
        serde_json::from_value(json).unwrap()
    }

    fn walk<'v>(path: &str, data: &'v Value) -> Vec<Context<'v>> {
        parse(path).unwrap().contexts(data)
    }

    #[test]
    fn test_walk_empty_path() {
        let data = value(json!({"": {"field": 5}}));
        let matches = walk("", &data);

        assert_eq!(
            matches,
            vec![Context {
                value: data.get(""),
                parent: Some(&data),
                path: Path::element(Some("")),
                name: String::new(),
                index: None,
                outcome: Outcome::Found,
            }]
        );
    }

    #[test]
    fn test_walk_single_key() {
        let data = value(json!({"object": {"field": 5}}));
        let matches = walk("object", &data);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value, data.get("object"));
        assert_eq!(matches[0].parent, Some(&data));
        assert_eq!(matches[0].name, "object");
        assert_eq!(matches[0].outcome, Outcome::Found);
    }

    #[test]
    fn test_walk_object_field() {
        let data = value(json!({"object": {"field": 5}}));
        let matches = walk("object.field", &data);

        assert_eq!(
            matches,
            vec![Context {
                value: Some(&Value::from(5i64)),
                parent: data.get("object"),
                path: Path::object(Some("object"), Path::element(Some("field"))),
                name: "field".to_string(),
                index: None,
                outcome: Outcome::Found,
            }]
        );
    }

    #[test]
    fn test_walk_array_wildcard() {
        let data = value(json!({"array": ["a", "b", "c"]}));
        let matches = walk("array[]", &data);

        assert_eq!(matches.len(), 3);
        for (i, (context, expected)) in matches.iter().zip(["a", "b", "c"]).enumerate() {
            assert_eq!(context.outcome, Outcome::Found);
            assert_eq!(context.value, Some(&Value::from(expected)));
            assert_eq!(context.parent, data.get("array"));
            assert_eq!(context.name, "");
            assert_eq!(context.index, Some(i));
            assert_eq!(
                context.path,
                Path::array_at(Some("array"), i, Path::element(None))
            );
        }
    }

    #[test]
    fn test_walk_nested_wildcards() {
        let data = value(json!({"array": [[], ["a", "b"], ["c"]]}));
        let outer = data.get("array").and_then(Value::as_sequence).unwrap();
        let matches = walk("array[][]", &data);

        assert_eq!(matches.len(), 4);

        assert_eq!(matches[0].outcome, Outcome::ElementNotFound);
        assert_eq!(matches[0].value, None);
        assert_eq!(matches[0].parent, Some(&outer[0]));
        assert_eq!(matches[0].index, None);
        assert_eq!(
            matches[0].path,
            Path::array_at(Some("array"), 0, Path::array(None, Path::element(None)))
        );

        assert_eq!(matches[1].value, Some(&Value::from("a")));
        assert_eq!(matches[1].parent, Some(&outer[1]));
        assert_eq!(matches[1].index, Some(0));
        assert_eq!(
            matches[1].path,
            Path::array_at(Some("array"), 1, Path::array_at(None, 0, Path::element(None)))
        );

        assert_eq!(matches[2].value, Some(&Value::from("b")));
        assert_eq!(matches[2].path.to_string(), "array[1][1]");

        assert_eq!(matches[3].value, Some(&Value::from("c")));
        assert_eq!(matches[3].parent, Some(&outer[2]));
        assert_eq!(matches[3].path.to_string(), "array[2][0]");
        assert!(matches[1..].iter().all(Context::is_found));
    }

    #[test]
    fn test_walk_array_of_objects_with_arrays() {
        let data = value(json!({"array": [
            {"field": []},
            {"field": ["a", "b"]},
            {},
            {"field": ["c"]},
        ]}));
        let items = data.get("array").and_then(Value::as_sequence).unwrap();
        let matches = walk("array[].field[]", &data);

        let outcomes: Vec<Outcome> = matches.iter().map(|c| c.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                Outcome::ElementNotFound,
                Outcome::Found,
                Outcome::Found,
                Outcome::ParentNotFound,
                Outcome::Found,
            ]
        );

        assert_eq!(matches[0].parent, items[0].get("field"));
        assert_eq!(matches[0].index, None);
        assert_eq!(
            matches[0].path,
            Path::array_at(
                Some("array"),
                0,
                Path::object(None, Path::array(Some("field"), Path::element(None))),
            )
        );

        assert_eq!(matches[1].value, Some(&Value::from("a")));
        assert_eq!(matches[1].path.to_string(), "array[1].field[0]");
        assert_eq!(matches[2].value, Some(&Value::from("b")));
        assert_eq!(matches[2].index, Some(1));

        assert_eq!(matches[3].parent, Some(&items[2]));
        assert_eq!(matches[3].name, "field");
        assert_eq!(matches[3].index, None);
        let field = matches[3].path.next().unwrap().next().unwrap();
        assert_eq!(field.index(), Some(Index::Wildcard));
        assert_eq!(matches[3].path.to_string(), "array[2].field[]");

        assert_eq!(matches[4].value, Some(&Value::from("c")));
        assert_eq!(matches[4].path.to_string(), "array[3].field[0]");
    }

    #[test]
    fn test_walk_field_in_array_elements() {
        let data = value(json!({"array": [
            {"field": []},
            {"field": ["a", "b"]},
            {},
            {"field": ["c"]},
        ]}));
        let items = data.get("array").and_then(Value::as_sequence).unwrap();
        let matches = walk("array[].field", &data);

        assert_eq!(matches.len(), 4);
        for (i, context) in matches.iter().enumerate() {
            assert_eq!(context.parent, Some(&items[i]));
            assert_eq!(context.name, "field");
            assert_eq!(context.index, None);
            assert_eq!(context.value, items[i].get("field"));
        }
        assert_eq!(matches[2].outcome, Outcome::ElementNotFound);
        assert_eq!(matches[2].path.to_string(), "array[2].field");
    }

    #[test]
    fn test_walk_empty_array() {
        let data = value(json!({"array": [], "narray": []}));

        let matches = walk("array[]", &data);
        assert_eq!(
            matches,
            vec![Context {
                value: None,
                parent: data.get("array"),
                path: Path::array(Some("array"), Path::element(None)),
                name: String::new(),
                index: None,
                outcome: Outcome::ElementNotFound,
            }]
        );

        let matches = walk("narray[][][]", &data);
        assert_eq!(
            matches,
            vec![Context {
                value: None,
                parent: data.get("narray"),
                path: Path::array(Some("narray"), Path::element(None)),
                name: String::new(),
                index: None,
                outcome: Outcome::ParentNotFound,
            }]
        );
    }

    #[test]
    fn test_walk_not_found_in_object() {
        let data = value(json!({"object": {"field": 5}}));
        let matches = walk("object.notafield", &data);

        assert_eq!(
            matches,
            vec![Context {
                value: None,
                parent: data.get("object"),
                path: Path::object(Some("object"), Path::element(Some("notafield"))),
                name: "notafield".to_string(),
                index: None,
                outcome: Outcome::ElementNotFound,
            }]
        );
    }

    #[test]
    fn test_walk_not_found_in_empty_array() {
        let data = value(json!({"array": []}));
        let matches = walk("array[].field", &data);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].outcome, Outcome::ParentNotFound);
        assert_eq!(matches[0].parent, data.get("array"));
        assert_eq!(
            matches[0].path,
            Path::array(Some("array"), Path::element(None))
        );
    }

    #[test]
    fn test_walk_element_missing_key() {
        let data = value(json!({"array": [{}]}));
        let matches = walk("array[].field", &data);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].outcome, Outcome::ElementNotFound);
        assert_eq!(matches[0].name, "field");
    }

    #[test]
    fn test_walk_sequence_expected() {
        let data = value(json!({"object": {
            "field": ["a", "b"],
            "array": [5, ["a", "b"], {"field": "1"}],
        }}));
        let object = data.get("object").unwrap();

        let matches = walk("object.field[][]", &data);
        assert_eq!(matches.len(), 2);
        for (i, context) in matches.iter().enumerate() {
            assert_eq!(context.outcome, Outcome::ParentNotFound);
            assert_eq!(context.value, None);
            assert_eq!(context.parent, object.get("field"));
            assert_eq!(context.index, Some(i));
            assert_eq!(
                context.path,
                Path::object(Some("object"), Path::array_at(Some("field"), i, Path::element(None)))
            );
        }

        let matches = walk("object.array[][]", &data);
        let array = object.get("array").and_then(Value::as_sequence).unwrap();
        let summary: Vec<(Outcome, String)> = matches
            .iter()
            .map(|c| (c.outcome, c.path.to_string()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Outcome::ParentNotFound, "object.array[0]".to_string()),
                (Outcome::Found, "object.array[1][0]".to_string()),
                (Outcome::Found, "object.array[1][1]".to_string()),
                (Outcome::ParentNotFound, "object.array[2]".to_string()),
            ]
        );
        assert_eq!(matches[0].parent, object.get("array"));
        assert_eq!(matches[1].parent, Some(&array[1]));
        assert_eq!(matches[3].index, Some(2));
    }

    #[test]
    fn test_walk_with_bound_index() {
        let data = value(json!({"array": [
            {"field": []},
            {"field": ["a", "b"]},
            {},
            {"field": ["c"]},
            {"field": ["d", "e"]},
        ]}));
        let path = Path::array_at(
            Some("array"),
            1,
            Path::object(None, Path::array_at(Some("field"), 1, Path::element(None))),
        );
        let items = data.get("array").and_then(Value::as_sequence).unwrap();

        assert_eq!(
            path.contexts(&data),
            vec![Context {
                value: Some(&Value::from("b")),
                parent: items[1].get("field"),
                path: path.clone(),
                name: String::new(),
                index: Some(1),
                outcome: Outcome::Found,
            }]
        );
    }

    #[test]
    fn test_walk_with_index_out_of_bounds() {
        let data = value(json!({"array": [{"field": []}, {"field": ["a", "b"]}]}));
        let path = Path::array_at(
            Some("array"),
            1,
            Path::object(None, Path::array_at(Some("field"), 5, Path::element(None))),
        );
        let items = data.get("array").and_then(Value::as_sequence).unwrap();

        assert_eq!(
            path.contexts(&data),
            vec![Context {
                value: None,
                parent: items[1].get("field"),
                path: path.clone(),
                name: String::new(),
                index: Some(5),
                outcome: Outcome::ElementNotFound,
            }]
        );
    }

    #[test]
    fn test_walk_missing_object() {
        let data = value(json!({}));
        let path = Path::object(
            Some("object"),
            Path::object(Some("subobject"), Path::element(Some("field"))),
        );

        assert_eq!(
            path.contexts(&data),
            vec![Context {
                value: None,
                parent: Some(&data),
                path: path.clone(),
                name: "object".to_string(),
                index: None,
                outcome: Outcome::ParentNotFound,
            }]
        );
    }

    #[test]
    fn test_walk_scalar_where_object_expected() {
        let data = value(json!({"object": 5}));
        let matches = walk("object.field", &data);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].outcome, Outcome::ParentNotFound);
        assert_eq!(matches[0].parent, Some(&data));
        assert_eq!(matches[0].name, "object");
        assert_eq!(matches[0].path, Path::element(Some("object")));
    }

    #[test]
    fn test_walk_null_leaf_is_found() {
        let data = value(json!({"object": {"field": null}}));
        let matches = walk("object.field", &data);

        assert_eq!(matches[0].outcome, Outcome::Found);
        assert_eq!(matches[0].value, Some(&Value::Null));
    }

    #[test]
    fn test_walk_null_container_is_parent_not_found() {
        let data = value(json!({"array": null}));
        let matches = walk("array[]", &data);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].outcome, Outcome::ParentNotFound);
        assert_eq!(matches[0].path.to_string(), "array");
    }

    #[test]
    fn test_walk_non_mapping_root() {
        let data = value(json!([1, 2]));
        let matches = walk("field", &data);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].outcome, Outcome::ParentNotFound);
        assert_eq!(matches[0].parent, Some(&data));
        assert_eq!(matches[0].name, "field");
    }

    #[test]
    fn test_walk_leaves_template_untouched() {
        let data = value(json!({"array": [1, 2]}));
        let path = parse("array[]").unwrap();
        let before = path.clone();

        assert_eq!(path.contexts(&data).len(), 2);
        assert_eq!(path, before);
        assert_eq!(path.index(), Some(Index::Unbound));
    }

    #[test]
    fn test_walk_concurrently() {
        let first = value(json!({"array": [{"v": 1}, {"v": 2}]}));
        let second = value(json!({"array": [{"v": 3}]}));
        let path = parse("array[].v").unwrap();

        std::thread::scope(|scope| {
            let a = scope.spawn(|| path.contexts(&first).len());
            let b = scope.spawn(|| path.contexts(&second).len());
            assert_eq!(a.join().unwrap(), 2);
            assert_eq!(b.join().unwrap(), 1);
        });
    }
}
