use std::fmt;

use crate::presentation::components::{Component, Item};

/// A component made of other components
///
/// Children keep their insertion order and may repeat. Nested composites are
/// flattened depth-first, so adding a composite to a view adds every leaf
/// below it in the order the children were added.
#[derive(Default)]
pub struct CompositeComponent {
    components: Vec<Box<dyn Component>>,
}

impl CompositeComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `component` as the last child
    pub fn add_component<C: Component + 'static>(&mut self, component: C) -> &mut Self {
        self.components.push(Box::new(component));
        self
    }

    /// Owned form of [`CompositeComponent::add_component`]
    pub fn with_component<C: Component + 'static>(mut self, component: C) -> Self {
        self.add_component(component);
        self
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }
}

impl Component for CompositeComponent {
    fn items(&self) -> Vec<Item> {
        self.components
            .iter()
            .flat_map(|component| component.items())
            .collect()
    }
}

impl fmt::Debug for CompositeComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeComponent")
            .field("components", &self.components.len())
            .field("items", &self.items())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        error::ViewError,
        presentation::{
            components::{StatefulButton, TextInput},
            views::View,
        },
    };

    fn labels(items: &[Item]) -> Vec<String> {
        items
            .iter()
            .map(|item| match item {
                Item::Button(button) => button.label(),
                Item::Select(select) => select.custom_id(),
                Item::TextInput(input) => input.label.clone(),
            })
            .collect()
    }

    /// Collects items and refuses more than `capacity`
    struct Tray {
        items: Vec<Item>,
        capacity: usize,
    }

    impl View for Tray {
        fn id(&self) -> &str {
            "tray"
        }

        fn add_item(&mut self, item: Item) -> Result<(), ViewError> {
            self.items.push(item);
            Ok(())
        }

        fn remaining_capacity(&self) -> Option<usize> {
            Some(self.capacity - self.items.len())
        }
    }

    #[test]
    fn test_add_component_preserves_order_and_duplicates() {
        let save = StatefulButton::primary("Save", None);
        let mut bar = CompositeComponent::new();
        bar.add_component(save.clone())
            .add_component(StatefulButton::danger("Cancel", None))
            .add_component(save);

        assert_eq!(bar.len(), 3);
        assert_eq!(labels(&bar.items()), vec!["Save", "Cancel", "Save"]);
    }

    #[test]
    fn test_nested_composites_flatten_depth_first() {
        let inner = CompositeComponent::new()
            .with_component(StatefulButton::primary("b", None))
            .with_component(TextInput::new("c"));
        let outer = CompositeComponent::new()
            .with_component(StatefulButton::primary("a", None))
            .with_component(inner)
            .with_component(CompositeComponent::new())
            .with_component(StatefulButton::primary("d", None));

        assert_eq!(labels(&outer.items()), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_add_to_view_forwards_every_item() {
        let bar = CompositeComponent::new()
            .with_component(StatefulButton::primary("Save", None))
            .with_component(StatefulButton::danger("Cancel", None));
        let mut view: Vec<Item> = Vec::new();

        bar.add_to_view(&mut view).unwrap();

        assert_eq!(labels(&view), vec!["Save", "Cancel"]);
    }

    #[test]
    fn test_add_to_view_is_all_or_nothing() {
        let bar = CompositeComponent::new()
            .with_component(StatefulButton::primary("a", None))
            .with_component(StatefulButton::primary("b", None))
            .with_component(StatefulButton::primary("c", None));
        let mut tray = Tray {
            items: Vec::new(),
            capacity: 2,
        };

        let err = bar.add_to_view(&mut tray).unwrap_err();

        assert_eq!(
            err,
            ViewError::ViewFull {
                view_id: "tray".into(),
                requested: 3,
                remaining: 2
            }
        );
        assert!(tray.items.is_empty());
    }

    #[test]
    fn test_empty_composite_adds_nothing() {
        let mut view: Vec<Item> = Vec::new();
        CompositeComponent::new().add_to_view(&mut view).unwrap();

        assert!(view.is_empty());
    }
}
