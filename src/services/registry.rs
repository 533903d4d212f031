use crate::models::{error::Error, route::Route};
use std::collections::HashMap;

/// What the registry knows about one widget: its URL path suffix and the
/// route that extracts its series from the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSpec {
    pub path: String,
    pub route: Route,
}

/// Immutable catalogue of the (category, widget) pairs the client can
/// query, each mapped to its URL path and extraction route.
///
/// Built once and handed to the client; `Registry::default()` carries the
/// REData widgets with hand-authored routes, `from_entries` injects a
/// custom catalogue (e.g. for a mock server).
#[derive(Debug, Clone)]
pub struct Registry {
    entries: HashMap<(String, String), StreamSpec>,
}

/// Flat routes extract each `included` entry directly; nested routes
/// descend one further level into `attributes.content`.
const FLAT: &[&[&str]] = &[&["included"]];
const NESTED: &[&[&str]] = &[&["included"], &["attributes", "content"]];

/// The REData widget catalogue: (category, widget, route shape).
const CATALOGUE: &[(&str, &str, &[&[&str]])] = &[
    ("balance", "balance-electrico", NESTED),
    ("demanda", "evolucion", FLAT),
    ("demanda", "variacion-componentes", FLAT),
    ("demanda", "variacion-componentes-movil", FLAT),
    ("demanda", "ire-general", FLAT),
    ("demanda", "ire-industria", FLAT),
    ("demanda", "ire-servicios", FLAT),
    ("generacion", "estructura-generacion", FLAT),
    ("generacion", "evolucion-renovable-no-renovable", FLAT),
    ("generacion", "potencia-instalada", FLAT),
    ("generacion", "estructura-renovables", FLAT),
    ("intercambios", "francia-frontera", NESTED),
    ("intercambios", "portugal-frontera", NESTED),
    ("intercambios", "marruecos-frontera", NESTED),
    ("intercambios", "todas-fronteras-fisicos", NESTED),
    ("mercados", "precios-mercados-tiempo-real", FLAT),
    ("mercados", "componentes-precio", NESTED),
    ("transporte", "energia-transportada", FLAT),
];

impl Registry {
    /// Builds a registry from explicit (category, widget, route) entries.
    /// The path suffix is derived as `category/widget`.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S, Route)>,
        S: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(category, widget, route)| {
                let category = category.into();
                let widget = widget.into();
                let path = format!("{category}/{widget}");
                ((category, widget), StreamSpec { path, route })
            })
            .collect();
        Self { entries }
    }

    /// Looks up the stream spec for a (category, widget) pair.
    pub fn lookup(&self, category: &str, widget: &str) -> Result<&StreamSpec, Error> {
        self.entries
            .get(&(category.to_string(), widget.to_string()))
            .ok_or_else(|| Error::UnsupportedWidget {
                category: category.to_string(),
                widget: widget.to_string(),
            })
    }

    /// Registered (category, widget) pairs, in no particular order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .keys()
            .map(|(category, widget)| (category.as_str(), widget.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::from_entries(
            CATALOGUE
                .iter()
                .map(|(category, widget, route)| (*category, *widget, Route::from_keys(route))),
        )
    }
}
