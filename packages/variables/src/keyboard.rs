//! # Key Interceptor
//!
//! Stateless key-down policy for carets inside rendered markers. Markers
//! are non-editable: the only permitted edits are wholesale deletion and
//! stepping out of the marker.

use tracing::trace;
use varmark_dom::Node;
use varmark_surface::{Key, KeyDisposition, Surface, SurfaceError, VariableEvent};

use crate::error::ExtensionError;
use crate::renderer::{MARKER_CLASS, ORIGINAL_ATTR};

/// Apply the marker key policy to one key-down event
///
/// Evaluated fresh per event; no memory of prior keystrokes. When the caret
/// is not inside a marker the event passes through untouched.
pub fn intercept(surface: &mut Surface, key: Key) -> Result<KeyDisposition, ExtensionError> {
    let Some(caret) = surface.caret().cloned() else {
        return Ok(KeyDisposition::Default);
    };
    let Some(element) = surface.caret_element() else {
        return Err(SurfaceError::UnknownNode(caret.element_id).into());
    };
    if !element.has_class(MARKER_CLASS) {
        return Ok(KeyDisposition::Default);
    }

    let marker_id = element.id.clone();
    let marker_content = element.text_content();
    let marker_raw = element.attribute(ORIGINAL_ATTR).map(str::to_string);

    match key {
        Key::Backspace | Key::Delete => {
            let path = surface
                .body()
                .find_path(|candidate| candidate.id == marker_id)
                .ok_or(SurfaceError::UnknownNode(marker_id))?;
            surface.body_mut().remove(&path);
            surface.set_caret(None);
            surface.emit(VariableEvent::Deleted {
                content: marker_content,
            });
            Ok(KeyDisposition::Default)
        }

        Key::Space | Key::Right | Key::Up | Key::Down => {
            // step out: a single space after the marker, caret behind it
            let raw = marker_raw.ok_or_else(|| SurfaceError::UnknownNode(marker_id.clone()))?;
            let path = surface
                .body()
                .find_by_attribute(ORIGINAL_ATTR, &raw)
                .ok_or(SurfaceError::UnknownNode(marker_id))?;
            surface
                .body_mut()
                .insert_after(&path, Node::Text(" ".to_string()));

            let parent_id = parent_element_id(surface, &path);
            let child_index = path.last().copied().unwrap_or(0) + 1;
            surface.set_caret(Some(varmark_surface::Caret {
                element_id: parent_id,
                child_index,
                offset: 1,
            }));
            Ok(KeyDisposition::Suppressed)
        }

        Key::Left => Ok(KeyDisposition::Default),

        other => {
            trace!(key = ?other, marker = %marker_id, "suppressed edit inside marker");
            surface.emit(VariableEvent::ModifyAttempt { node_id: marker_id });
            Ok(KeyDisposition::Suppressed)
        }
    }
}

fn parent_element_id(surface: &Surface, path: &[usize]) -> String {
    let parent_path = &path[..path.len().saturating_sub(1)];
    if parent_path.is_empty() {
        return surface.body().id.clone();
    }
    surface
        .body()
        .node_at(parent_path)
        .and_then(Node::as_element)
        .map(|element| element.id.clone())
        .unwrap_or_else(|| surface.body().id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Renderer;
    use std::sync::{Arc, Mutex};
    use varmark_surface::Caret;

    fn rendered_surface(markup: &str) -> Surface {
        let mut surface = Surface::with_content("test", markup).unwrap();
        Renderer::new().render(&mut surface);
        surface
    }

    fn caret_into_marker(surface: &mut Surface, raw: &str) {
        let path = surface.body().find_by_attribute(ORIGINAL_ATTR, raw).unwrap();
        let id = surface
            .body()
            .node_at(&path)
            .and_then(Node::as_element)
            .unwrap()
            .id
            .clone();
        surface.set_caret(Some(Caret {
            element_id: id,
            child_index: 0,
            offset: 0,
        }));
    }

    fn recorded_events(surface: &mut Surface) -> Arc<Mutex<Vec<VariableEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        surface.subscribe(move |event: &VariableEvent| sink.lock().unwrap().push(event.clone()));
        events
    }

    #[test]
    fn test_backspace_removes_marker_and_fires_one_deletion() {
        let mut surface = rendered_surface("Hi {user.name}!");
        let events = recorded_events(&mut surface);
        caret_into_marker(&mut surface, "{user.name}");

        let disposition = intercept(&mut surface, Key::Backspace).unwrap();

        assert_eq!(disposition, KeyDisposition::Default);
        assert_eq!(surface.content(), "Hi !");
        let events = events.lock().unwrap();
        assert_eq!(
            events.as_slice(),
            &[VariableEvent::Deleted {
                content: "user.name".to_string()
            }]
        );
    }

    #[test]
    fn test_space_inserts_space_after_marker_and_moves_caret() {
        let mut surface = rendered_surface("{foo}");
        caret_into_marker(&mut surface, "{foo}");

        let disposition = intercept(&mut surface, Key::Space).unwrap();

        assert_eq!(disposition, KeyDisposition::Suppressed);
        assert_eq!(surface.body().node_at(&[1]).and_then(Node::as_text), Some(" "));

        let caret = surface.caret().unwrap();
        assert_eq!(caret.element_id, surface.body().id);
        assert_eq!(caret.child_index, 1);
        assert_eq!(caret.offset, 1);
    }

    #[test]
    fn test_right_arrow_behaves_like_space() {
        let mut surface = rendered_surface("a {foo} b");
        caret_into_marker(&mut surface, "{foo}");

        let disposition = intercept(&mut surface, Key::Right).unwrap();

        assert_eq!(disposition, KeyDisposition::Suppressed);
        // marker at child 1, inserted space at child 2
        assert_eq!(surface.body().node_at(&[2]).and_then(Node::as_text), Some(" "));
        assert_eq!(surface.caret().unwrap().child_index, 2);
    }

    #[test]
    fn test_left_arrow_passes_through() {
        let mut surface = rendered_surface("{foo}");
        let events = recorded_events(&mut surface);
        caret_into_marker(&mut surface, "{foo}");
        let before = surface.content();

        let disposition = intercept(&mut surface, Key::Left).unwrap();

        assert_eq!(disposition, KeyDisposition::Default);
        assert_eq!(surface.content(), before);
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_printable_key_suppressed_with_one_modify_attempt() {
        let mut surface = rendered_surface("{foo}");
        let events = recorded_events(&mut surface);
        caret_into_marker(&mut surface, "{foo}");
        let before = surface.content();

        let disposition = intercept(&mut surface, Key::Char('x')).unwrap();

        assert_eq!(disposition, KeyDisposition::Suppressed);
        assert_eq!(surface.content(), before, "no text insertion");
        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], VariableEvent::ModifyAttempt { .. }));
    }

    #[test]
    fn test_caret_outside_marker_is_ignored() {
        let mut surface = rendered_surface("plain {foo}");
        let body_id = surface.body().id.clone();
        surface.set_caret(Some(Caret {
            element_id: body_id,
            child_index: 0,
            offset: 2,
        }));

        let disposition = intercept(&mut surface, Key::Char('x')).unwrap();
        assert_eq!(disposition, KeyDisposition::Default);
    }

    #[test]
    fn test_no_caret_is_ignored() {
        let mut surface = rendered_surface("{foo}");
        let disposition = intercept(&mut surface, Key::Backspace).unwrap();
        assert_eq!(disposition, KeyDisposition::Default);
    }

    #[test]
    fn test_stale_caret_is_an_error() {
        let mut surface = rendered_surface("{foo}");
        surface.set_caret(Some(Caret {
            element_id: "gone".to_string(),
            child_index: 0,
            offset: 0,
        }));

        let result = intercept(&mut surface, Key::Char('x'));
        assert!(matches!(
            result,
            Err(ExtensionError::Surface(SurfaceError::UnknownNode(_)))
        ));
    }
}
