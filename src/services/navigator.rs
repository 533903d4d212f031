use crate::models::{error::Error, route::Route};
use serde_json::Value;

/// Lazy iterator over the terminal objects reached by applying `route` to a
/// JSON value.
///
/// Descent is depth-first and left-to-right, matching the document's own
/// array and key order; that order determines final column order. Lists met
/// at any level are flattened against the same unconsumed route, so an
/// endpoint may return a bare object or a list of objects at any nesting
/// level without special-casing. The first shape mismatch ends the
/// iteration with an error.
pub struct TerminalObjects<'a> {
    route: &'a Route,
    // (value, number of route steps already consumed)
    stack: Vec<(&'a Value, usize)>,
    failed: bool,
}

impl<'a> TerminalObjects<'a> {
    pub fn new(value: &'a Value, route: &'a Route) -> Self {
        Self {
            route,
            stack: vec![(value, 0)],
            failed: false,
        }
    }

    fn descend(&mut self, value: &'a Value, step: usize) -> Result<(), Error> {
        let mut current = value;
        for key in self.route.steps()[step].keys() {
            match current.get(key) {
                Some(next) => current = next,
                None => {
                    return Err(Error::MissingKey {
                        step,
                        key: key.clone(),
                    });
                }
            }
        }
        self.stack.push((current, step + 1));
        Ok(())
    }
}

impl<'a> Iterator for TerminalObjects<'a> {
    type Item = Result<&'a Value, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while let Some((value, step)) = self.stack.pop() {
            match value {
                Value::Array(items) => {
                    // Reverse push keeps left-to-right yield order. Lists
                    // are flattened before the exhaustion check, so a route
                    // ending on a list of series yields the series
                    // themselves.
                    for item in items.iter().rev() {
                        self.stack.push((item, step));
                    }
                }
                _ if step == self.route.len() => return Some(Ok(value)),
                Value::Object(_) => {
                    if let Err(e) = self.descend(value, step) {
                        self.failed = true;
                        return Some(Err(e));
                    }
                }
                other => {
                    self.failed = true;
                    return Some(Err(Error::UnexpectedShape {
                        step,
                        found: json_type_name(other),
                    }));
                }
            }
        }
        None
    }
}

/// Applies `route` to `value` and collects every terminal object, in
/// document order.
pub fn navigate<'a>(value: &'a Value, route: &'a Route) -> Result<Vec<&'a Value>, Error> {
    TerminalObjects::new(value, route).collect()
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
