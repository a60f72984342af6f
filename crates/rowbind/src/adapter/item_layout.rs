//! The item-layout attribute.
//!
//! A layout declaration names the row layout of an adapter-backed widget in
//! one of two forms:
//!
//! - `@type/name`: a static resource reference, resolved once at bind time
//! - `{property}`: a dynamic binding to a layout id property, whose current
//!   and later values are pushed into the layout selector
//!
//! Static references are validated when the attribute is parsed, so a
//! malformed value fails before any view is built.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use rowbind_core::logging::targets;
use rowbind_core::{ConnectionId, ObservableProperty};

use super::layout::{ItemLayoutSelector, LayoutId};
use crate::error::{AdapterError, Result};

static RESOURCE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@(\w+)/(\w+)$").expect("resource reference pattern is valid")
});

/// Resolves `(type, name)` resource pairs to layout identifiers.
pub trait ResourceLookup {
    /// The identifier of resource `name` of kind `resource_type`, if any.
    fn identifier(&self, resource_type: &str, name: &str) -> Option<LayoutId>;
}

/// A parsed `@type/name` resource reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StaticLayoutReference {
    resource_type: String,
    name: String,
}

impl StaticLayoutReference {
    /// Parse `value` as `@type/name`.
    ///
    /// # Example
    ///
    /// ```
    /// use rowbind::adapter::StaticLayoutReference;
    ///
    /// let reference = StaticLayoutReference::parse("@layout/row_item").unwrap();
    /// assert_eq!(reference.resource_type(), "layout");
    /// assert_eq!(reference.name(), "row_item");
    ///
    /// assert!(StaticLayoutReference::parse("badformat").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self> {
        let captures = RESOURCE_REFERENCE
            .captures(value)
            .ok_or_else(|| AdapterError::invalid_layout_reference(value))?;
        Ok(Self {
            resource_type: captures[1].to_string(),
            name: captures[2].to_string(),
        })
    }

    /// The resource type, e.g. `layout`.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// The resource name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve through `lookup`.
    pub fn resolve(&self, lookup: &dyn ResourceLookup) -> Result<LayoutId> {
        lookup
            .identifier(&self.resource_type, &self.name)
            .ok_or_else(|| AdapterError::UnresolvedResource {
                resource_type: self.resource_type.clone(),
                name: self.name.clone(),
            })
    }
}

impl FromStr for StaticLayoutReference {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for StaticLayoutReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}/{}", self.resource_type, self.name)
    }
}

/// An observable layout identifier a dynamic attribute can bind to.
pub type LayoutIdProperty = ObservableProperty<LayoutId>;

/// What an item-layout attribute needs from its surroundings at bind time.
pub trait LayoutBindingContext: ResourceLookup {
    /// The layout id property named `name`, if the context exposes one.
    fn layout_id_property(&self, name: &str) -> Option<Arc<LayoutIdProperty>>;
}

/// A parsed item-layout attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemLayoutAttribute {
    /// `@type/name`.
    Static(StaticLayoutReference),
    /// `{property}`.
    Dynamic {
        /// Name of the bound property.
        property: String,
    },
}

impl ItemLayoutAttribute {
    /// Parse an attribute value.
    ///
    /// A value wrapped in braces is a dynamic binding; anything else must be a
    /// valid static reference.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if let Some(property) = trimmed
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        {
            let property = property.trim();
            if property.is_empty() {
                return Err(AdapterError::invalid_layout_reference(value));
            }
            return Ok(Self::Dynamic {
                property: property.to_string(),
            });
        }
        StaticLayoutReference::parse(trimmed).map(Self::Static)
    }

    /// Whether this is a `{property}` binding.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic { .. })
    }

    /// Push this attribute's layout into `selector`.
    ///
    /// A static reference is resolved and pushed once. A dynamic binding
    /// pushes the property's current value and then every later change for as
    /// long as the returned binding is alive.
    pub fn bind<T: 'static>(
        &self,
        selector: Arc<dyn ItemLayoutSelector<T>>,
        context: &dyn LayoutBindingContext,
    ) -> Result<ItemLayoutBinding> {
        match self {
            Self::Static(reference) => {
                let layout = reference.resolve(context)?;
                tracing::debug!(target: targets::LAYOUT, %reference, layout, "binding static item layout");
                selector.set_item_layout_id(layout);
                Ok(ItemLayoutBinding { connection: None })
            }
            Self::Dynamic { property } => {
                let source = context.layout_id_property(property).ok_or_else(|| {
                    AdapterError::UnknownLayoutProperty {
                        property: property.clone(),
                    }
                })?;
                tracing::debug!(target: targets::LAYOUT, property = %property, "binding dynamic item layout");
                selector.set_item_layout_id(source.get());
                let id = source
                    .changed()
                    .connect(move |&layout| selector.set_item_layout_id(layout));
                Ok(ItemLayoutBinding {
                    connection: Some((source, id)),
                })
            }
        }
    }
}

impl FromStr for ItemLayoutAttribute {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A live item-layout binding.
///
/// Dropping it stops forwarding property changes to the selector.
#[must_use = "dropping the binding disconnects it"]
pub struct ItemLayoutBinding {
    connection: Option<(Arc<LayoutIdProperty>, ConnectionId)>,
}

impl ItemLayoutBinding {
    /// Whether later property changes are still forwarded.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }
}

impl Drop for ItemLayoutBinding {
    fn drop(&mut self) {
        if let Some((source, id)) = self.connection.take() {
            source.changed().disconnect(id);
        }
    }
}

impl fmt::Debug for ItemLayoutBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemLayoutBinding")
            .field("connected", &self.is_connected())
            .finish()
    }
}
