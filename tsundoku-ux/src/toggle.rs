use std::sync::Arc;

use tsundoku_types::Show;

/// Something a toggle can read its initial state from.
pub trait ToggleSource {
    /// `None` when the attribute is unset or not a boolean flag.
    fn flag(&self, attribute: &str) -> Option<bool>;
}

impl ToggleSource for Show {
    fn flag(&self, attribute: &str) -> Option<bool> {
        match attribute {
            "watch" => self.watch,
            "post_process" => self.post_process,
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ToggleProps {
    pub attribute: String,
    pub on_icon: String,
    pub off_icon: String,
    pub on_tooltip: String,
    pub off_tooltip: String,
    pub additional_classes: String,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleRender<'a> {
    pub classes: String,
    pub title: &'a str,
    pub icon: &'a str,
    pub disabled: bool,
}

/// Two-state button over one boolean attribute of a show.
pub struct ShowToggle<S: ToggleSource = Show> {
    props: ToggleProps,
    source: Option<Arc<S>>,
    state: bool,
    focused: bool,
    setter: Box<dyn FnMut(&str, bool)>,
}

fn derive_state<S: ToggleSource>(attribute: &str, source: Option<&S>) -> bool {
    source.and_then(|x| x.flag(attribute)).unwrap_or(true)
}

impl<S: ToggleSource> ShowToggle<S> {
    pub fn new(
        props: ToggleProps,
        source: Option<Arc<S>>,
        setter: impl FnMut(&str, bool) + 'static,
    ) -> Self {
        let state = derive_state(&props.attribute, source.as_deref());
        Self {
            props,
            source,
            state,
            focused: false,
            setter: Box::new(setter),
        }
    }

    pub fn state(&self) -> bool {
        self.state
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn props(&self) -> &ToggleProps {
        &self.props
    }

    /// Flips the state and reports the new value to the setter.
    pub fn click(&mut self) {
        if self.props.disabled {
            return;
        }
        self.state = !self.state;
        (self.setter)(&self.props.attribute, self.state);
        self.focused = false;
    }

    /// Re-derives the state when `source` is a different object than the
    /// current one. Passing the same `Arc` again keeps the displayed state.
    pub fn set_source(&mut self, source: Option<Arc<S>>) {
        let changed = match (&self.source, &source) {
            (Some(current), Some(new)) => !Arc::ptr_eq(current, new),
            (None, None) => false,
            _ => true,
        };
        self.source = source;
        if changed {
            self.state = derive_state(&self.props.attribute, self.source.as_deref());
        }
    }

    pub fn render(&self) -> ToggleRender<'_> {
        if self.state {
            ToggleRender {
                classes: format!("button {}", self.props.additional_classes),
                title: &self.props.on_tooltip,
                icon: &self.props.on_icon,
                disabled: self.props.disabled,
            }
        } else {
            ToggleRender {
                classes: format!("button is-outlined {}", self.props.additional_classes),
                title: &self.props.off_tooltip,
                icon: &self.props.off_icon,
                disabled: self.props.disabled,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use tsundoku_types::Metadata;

    use super::*;

    fn show(watch: Option<bool>) -> Arc<Show> {
        Arc::new(Show {
            id_: 1,
            title: "Bocchi the Rock!".to_string(),
            desired_format: None,
            desired_folder: None,
            season: 1,
            episode_offset: 0,
            metadata: Metadata::default(),
            entries: vec![],
            webhooks: vec![],
            watch,
            post_process: Some(false),
            created_at: None,
        })
    }

    fn props(attribute: &str) -> ToggleProps {
        ToggleProps {
            attribute: attribute.to_string(),
            on_icon: "eye".to_string(),
            off_icon: "eye-off".to_string(),
            on_tooltip: "Watching".to_string(),
            off_tooltip: "Not watching".to_string(),
            additional_classes: "is-small".to_string(),
            disabled: false,
        }
    }

    type Calls = Rc<RefCell<Vec<(String, bool)>>>;

    fn toggle(attribute: &str, source: Option<Arc<Show>>) -> (ShowToggle, Calls) {
        let calls = Calls::default();
        let sink = calls.clone();
        let toggle = ShowToggle::new(props(attribute), source, move |attribute, value| {
            sink.borrow_mut().push((attribute.to_string(), value))
        });
        (toggle, calls)
    }

    #[test]
    fn test_initial_state() {
        assert!(toggle("watch", None).0.state());
        assert!(toggle("watch", Some(show(None))).0.state());
        assert!(!toggle("watch", Some(show(Some(false)))).0.state());
        assert!(!toggle("post_process", Some(show(Some(true)))).0.state());
        assert!(toggle("no_such_attribute", Some(show(Some(false)))).0.state());
    }

    #[test]
    fn test_non_boolean_fields_are_not_flags() {
        let show = show(Some(false));
        assert_eq!(show.flag("watch"), Some(false));
        assert_eq!(show.flag("title"), None);
        assert_eq!(show.flag("season"), None);
    }

    #[test]
    fn test_click_reports_opposite_once() {
        let (mut toggle, calls) = toggle("watch", Some(show(Some(true))));
        toggle.focus();
        toggle.click();
        assert!(!toggle.state());
        assert!(!toggle.is_focused());
        assert_eq!(*calls.borrow(), vec![("watch".to_string(), false)]);

        toggle.click();
        assert!(toggle.state());
        assert_eq!(calls.borrow().len(), 2);
        assert_eq!(calls.borrow()[1], ("watch".to_string(), true));
    }

    #[test]
    fn test_disabled_ignores_clicks() {
        let calls = Calls::default();
        let sink = calls.clone();
        let mut props = props("watch");
        props.disabled = true;
        let mut toggle: ShowToggle = ShowToggle::new(props, None, move |attribute, value| {
            sink.borrow_mut().push((attribute.to_string(), value))
        });
        toggle.click();
        assert!(toggle.state());
        assert!(calls.borrow().is_empty());
        assert!(toggle.render().disabled);
    }

    #[test]
    fn test_source_change_resyncs() {
        let current = show(Some(true));
        let (mut toggle, calls) = toggle("watch", Some(current.clone()));
        toggle.click();
        assert!(!toggle.state());

        toggle.set_source(Some(current));
        assert!(!toggle.state());

        toggle.set_source(Some(show(Some(true))));
        assert!(toggle.state());

        toggle.set_source(Some(show(Some(false))));
        assert!(!toggle.state());

        toggle.set_source(None);
        assert!(toggle.state());
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_render() {
        let (mut toggle, _) = toggle("watch", None);
        assert_eq!(
            toggle.render(),
            ToggleRender {
                classes: "button is-small".to_string(),
                title: "Watching",
                icon: "eye",
                disabled: false,
            }
        );
        toggle.click();
        assert_eq!(
            toggle.render(),
            ToggleRender {
                classes: "button is-outlined is-small".to_string(),
                title: "Not watching",
                icon: "eye-off",
                disabled: false,
            }
        );
    }
}
