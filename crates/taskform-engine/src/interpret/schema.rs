use std::collections::HashMap;

use taskform_config::ValueOption;
use taskform_form::{
  ButtonAction, ButtonSpec, Choice, Field, FieldId, FieldKind, Form, TextFormat, TextInput,
};

use crate::config::EngineConfig;
use crate::host::HostContext;
use crate::interpolate::{Interpolator, value_text};
use crate::render::{
  ButtonBehavior, ButtonControl, ChoiceControl, ChoiceOption, Control, FileControl, FormMode,
  GroupControl, NumberControl, Placed, RenderedField, RenderedForm, RenderedRow, TextControl,
  WidgetControl, into_rows,
};

pub(crate) const LOGIN_CAPTION: &str = "Login to continue";

/// Interpret an explicit component tree.
///
/// Fields are visited in post-order, so a group's children are rendered and
/// laid out before the group itself.
pub(super) fn interpret(
  form: &Form,
  interpolator: &Interpolator<'_>,
  host: &HostContext,
  config: &EngineConfig,
) -> RenderedForm {
  let mut rendered: HashMap<FieldId, Placed> = HashMap::with_capacity(form.len());

  for id in form.post_order() {
    let Some(field) = form.get(id) else {
      continue;
    };

    let child_rows = if field.is_group() {
      let children = form
        .children(id)
        .iter()
        .filter_map(|child| rendered.remove(child))
        .collect();
      into_rows(children, config.total_columns)
    } else {
      Vec::new()
    };

    let placed = Placed {
      row: field.layout.row.clone(),
      columns: field.layout.columns,
      field: render_field(field, child_rows, interpolator, host),
    };
    rendered.insert(id, placed);
  }

  let roots = form
    .roots()
    .iter()
    .filter_map(|root| rendered.remove(root))
    .collect();

  RenderedForm {
    mode: FormMode::Schema,
    body: into_rows(roots, config.total_columns),
    footer: Vec::new(),
    needs_default_submit: !form.has_submit_control(),
    share_gate: Vec::new(),
  }
}

fn render_field(
  field: &Field,
  child_rows: Vec<RenderedRow>,
  interpolator: &Interpolator<'_>,
  host: &HostContext,
) -> RenderedField {
  let mut rendered = RenderedField {
    name: field.key.clone(),
    label: interpolator.render_opt(field.label.as_deref()),
    description: interpolator.render_opt(field.description.as_deref()),
    required: field.required,
    disabled: field.disabled,
    read_only: field.read_only,
    ..RenderedField::new(&field.field_id, Control::Spacer)
  };

  rendered.control = match &field.kind {
    FieldKind::TextField(input) => Control::Text(text_control(field, input, false, interpolator)),
    FieldKind::TextArea(input) => Control::Text(text_control(field, input, true, interpolator)),

    FieldKind::Number(input) => Control::Number(NumberControl {
      min: input.min,
      max: input.max,
      placeholder: interpolator.render_opt(input.placeholder.as_deref()),
      prefix: input.prefix.clone(),
      suffix: input.suffix.clone(),
      default_value: match field.property("value") {
        Some(value) => Some(number_value(&interpolator.render(value))),
        None => field.default_value.clone(),
      },
    }),

    FieldKind::DateTime(input) => {
      rendered.label = interpolator.render_opt(input.date_label.as_deref());
      Control::DateTime {
        subtype: input.subtype,
        default_value: initial_text(field, interpolator),
      }
    }

    FieldKind::Select(choice) => Control::Select {
      options: choice
        .options
        .iter()
        .map(|o| ValueOption::new(interpolator.render(&o.label), o.value.clone()))
        .collect(),
      default_value: default_text(field),
    },

    FieldKind::Checklist(choice) => Control::Checklist(choice_control(field, choice, interpolator)),
    FieldKind::Radio(choice) => Control::Radio(choice_control(field, choice, interpolator)),

    FieldKind::Checkbox { value } => Control::Checkbox {
      checked: field
        .default_value
        .as_ref()
        .is_some_and(|v| v.as_bool() == Some(true) || v.as_str() == Some("true")),
      value: value.clone(),
    },

    FieldKind::FilePicker(input) => Control::File(FileControl {
      multiple: input.multiple,
      accept: input.accept.clone(),
      size: input.size.clone(),
      deferred_upload: input.deferred_upload,
    }),

    FieldKind::Group(group) => match &group.dashboard {
      Some(slug) => Control::Dashboard {
        slug: slug.clone(),
        params: Default::default(),
      },
      None => Control::Group(GroupControl {
        show_outline: group.show_outline,
        max_width: group.max_width.clone(),
        rows: child_rows,
      }),
    },

    FieldKind::Button(button) => {
      if let Some(name) = &button.name {
        rendered.name = Some(name.clone());
      }
      Control::Button(button_control(
        button,
        rendered.label.as_deref(),
        interpolator,
        host,
      ))
    }

    FieldKind::Markdown { text } => Control::Markdown {
      source: interpolator.render(text),
    },
    FieldKind::Html { content } => Control::Html {
      source: interpolator.render(content),
    },
    FieldKind::Image { source } => Control::Image {
      source: interpolator.render(source.as_deref().unwrap_or_default()),
    },
    FieldKind::IFrame { url, height } => Control::IFrame {
      url: interpolator.render(url.as_deref().unwrap_or_default()),
      height: *height,
    },
    FieldKind::Separator => Control::Separator,
    FieldKind::Spacer => Control::Spacer,

    FieldKind::Widget(widget) => {
      rendered
        .name
        .get_or_insert_with(|| widget.name().to_string());
      Control::Widget(WidgetControl {
        value: field.default_value.clone(),
        ..WidgetControl::new(widget.name())
      })
    }

    FieldKind::Unknown { .. } => {
      tracing::warn!(
        field_id = %field.field_id,
        type_name = %field.kind.name(),
        "unsupported field type"
      );
      Control::Unsupported {
        type_name: field.kind.name().to_string(),
        reason: None,
      }
    }

    FieldKind::Invalid { reason, .. } => Control::Unsupported {
      type_name: field.kind.name().to_string(),
      reason: Some(reason.clone()),
    },
  };

  rendered
}

fn text_control(
  field: &Field,
  input: &TextInput,
  multiline: bool,
  interpolator: &Interpolator<'_>,
) -> TextControl {
  let input_type = match &input.format {
    TextFormat::Markdown => "markdown",
    TextFormat::Email => "email",
    TextFormat::Phone => "tel",
    TextFormat::Custom(custom) => custom.as_str(),
    TextFormat::Plain if multiline => "textarea",
    TextFormat::Plain => "text",
  };

  let default_value = initial_text(field, interpolator);

  TextControl {
    input_type: input_type.to_string(),
    min_length: input.min_length,
    max_length: input.max_length,
    pattern: input.pattern.clone(),
    placeholder: interpolator.render_opt(input.placeholder.as_deref()),
    prefix: input.prefix.clone(),
    suffix: input.suffix.clone(),
    size: input.size.clone(),
    default_value,
  }
}

fn choice_control(field: &Field, choice: &Choice, interpolator: &Interpolator<'_>) -> ChoiceControl {
  let default = default_text(field);

  ChoiceControl {
    style: choice.style,
    options: choice
      .options
      .iter()
      .enumerate()
      .map(|(i, option)| ChoiceOption {
        label: interpolator.render(&option.label),
        value: option.value.clone(),
        required: field.required && i == 0,
        checked: default.as_deref() == Some(option.value.as_str()),
      })
      .collect(),
  }
}

fn button_control(
  button: &ButtonSpec,
  label: Option<&str>,
  interpolator: &Interpolator<'_>,
  host: &HostContext,
) -> ButtonControl {
  let behavior = match (&button.href, button.cancels, button.action) {
    (Some(href), _, _) => ButtonBehavior::Link {
      href: interpolator.render(href),
      target: button.target.clone(),
    },
    (None, true, _) => ButtonBehavior::Cancel,
    (None, false, ButtonAction::Submit) => ButtonBehavior::Submit,
    (None, false, ButtonAction::Reset) => ButtonBehavior::Reset,
    (None, false, ButtonAction::Plain) => ButtonBehavior::Plain,
  };

  let caption = if host.has_session {
    label.unwrap_or_default().to_string()
  } else {
    LOGIN_CAPTION.to_string()
  };

  let variant = button.variant.clone().unwrap_or_else(|| {
    if behavior.is_submit() {
      "primary".to_string()
    } else {
      "secondary".to_string()
    }
  });

  ButtonControl {
    caption,
    behavior,
    variant,
    size: button.size.clone(),
    value: button.value.clone(),
  }
}

/// `properties.value` when set, otherwise the default value, interpolated.
fn initial_text(field: &Field, interpolator: &Interpolator<'_>) -> Option<String> {
  field
    .property("value")
    .map(String::from)
    .or_else(|| default_text(field))
    .map(|v| interpolator.render(&v))
}

/// A number when the text parses as one, the text itself otherwise.
fn number_value(text: &str) -> serde_json::Value {
  let trimmed = text.trim();
  if let Ok(n) = trimmed.parse::<i64>() {
    return n.into();
  }
  trimmed
    .parse::<f64>()
    .ok()
    .and_then(serde_json::Number::from_f64)
    .map_or_else(|| serde_json::Value::String(text.to_string()), Into::into)
}

fn default_text(field: &Field) -> Option<String> {
  field
    .default_value
    .as_ref()
    .map(value_text)
    .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use taskform_config::FormDef;
  use taskform_resolver::{Resolver, StandardResolver};
  use taskform_variables::{TypeTag, Variable, VariableStore};

  fn render(definition: serde_json::Value, host: &HostContext) -> RenderedForm {
    let def: FormDef = serde_json::from_value(definition).unwrap();
    let form = StandardResolver::new().resolve(def).unwrap();
    let store: VariableStore =
      std::iter::once(Variable::new("form_name", json!("Ada"), TypeTag::String)).collect();
    interpret(
      &form,
      &Interpolator::new(&store),
      host,
      &EngineConfig::default(),
    )
  }

  fn signed_in() -> HostContext {
    HostContext::new().with_session(true)
  }

  #[test]
  fn test_labels_are_interpolated() {
    let form = render(
      json!({ "components": [
        { "id": "greet", "type": "textfield", "key": "form_greeting",
          "label": "Hello ${form_name}", "description": "for ${missing}" }
      ]}),
      &signed_in(),
    );

    let field = form.field("greet").unwrap();
    assert_eq!(field.label.as_deref(), Some("Hello Ada"));
    assert_eq!(field.description.as_deref(), Some("for "));
    assert_eq!(field.name.as_deref(), Some("form_greeting"));
    assert_eq!(field.span, 16);
  }

  #[test]
  fn test_text_default_prefers_property_value() {
    let form = render(
      json!({ "components": [
        { "id": "a", "type": "textfield", "defaultValue": "plain",
          "properties": { "value": "${form_name}!" } },
        { "id": "b", "type": "textarea", "defaultValue": "kept" }
      ]}),
      &signed_in(),
    );

    match &form.field("a").unwrap().control {
      Control::Text(text) => {
        assert_eq!(text.input_type, "text");
        assert_eq!(text.default_value.as_deref(), Some("Ada!"));
      }
      other => panic!("unexpected {:?}", other),
    }
    match &form.field("b").unwrap().control {
      Control::Text(text) => {
        assert_eq!(text.input_type, "textarea");
        assert_eq!(text.default_value.as_deref(), Some("kept"));
      }
      other => panic!("unexpected {:?}", other),
    }
  }

  #[test]
  fn test_radio_options() {
    let form = render(
      json!({ "components": [
        { "id": "pick", "type": "radio", "defaultValue": "b",
          "validate": { "required": true },
          "values": [ { "label": "A for ${form_name}", "value": "a" }, { "label": "B", "value": "b" } ] }
      ]}),
      &signed_in(),
    );

    match &form.field("pick").unwrap().control {
      Control::Radio(choice) => {
        assert_eq!(choice.options[0].label, "A for Ada");
        assert!(choice.options[0].required);
        assert!(!choice.options[1].required);
        assert!(!choice.options[0].checked);
        assert!(choice.options[1].checked);
      }
      other => panic!("unexpected {:?}", other),
    }
  }

  #[test]
  fn test_group_children_are_laid_out_inside_group() {
    let form = render(
      json!({ "components": [
        { "id": "g", "type": "group", "showOutline": true, "components": [
          { "id": "a", "type": "textfield", "layout": { "row": "r", "columns": 4 } },
          { "id": "b", "type": "textfield", "layout": { "row": "r" } }
        ]},
        { "id": "c", "type": "separator" }
      ]}),
      &signed_in(),
    );

    assert_eq!(form.body.len(), 1);
    assert_eq!(form.body[0].fields.len(), 2);
    match &form.field("g").unwrap().control {
      Control::Group(group) => {
        assert!(group.show_outline);
        assert_eq!(group.rows.len(), 1);
        let spans: Vec<_> = group.rows[0].fields.iter().map(|f| f.span).collect();
        assert_eq!(spans, vec![4, 12]);
      }
      other => panic!("unexpected {:?}", other),
    }
  }

  #[test]
  fn test_number_and_date_prefer_property_value() {
    let form = render(
      json!({ "components": [
        { "id": "n", "type": "number", "defaultValue": 1, "properties": { "value": "42" } },
        { "id": "m", "type": "number", "defaultValue": 7 },
        { "id": "d", "type": "datetime", "defaultValue": "2024-01-01",
          "properties": { "value": "2025-06-30" } },
        { "id": "e", "type": "datetime", "defaultValue": "2024-01-01" }
      ]}),
      &signed_in(),
    );

    match &form.field("n").unwrap().control {
      Control::Number(number) => assert_eq!(number.default_value, Some(json!(42))),
      other => panic!("expected number, got {:?}", other),
    }
    match &form.field("m").unwrap().control {
      Control::Number(number) => assert_eq!(number.default_value, Some(json!(7))),
      other => panic!("expected number, got {:?}", other),
    }
    match &form.field("d").unwrap().control {
      Control::DateTime { default_value, .. } => {
        assert_eq!(default_value.as_deref(), Some("2025-06-30"))
      }
      other => panic!("expected datetime, got {:?}", other),
    }
    match &form.field("e").unwrap().control {
      Control::DateTime { default_value, .. } => {
        assert_eq!(default_value.as_deref(), Some("2024-01-01"))
      }
      other => panic!("expected datetime, got {:?}", other),
    }
  }

  #[test]
  fn test_file_picker_attributes() {
    let form = render(
      json!({ "components": [
        { "id": "upload", "type": "filepicker", "key": "form_doc", "multiple": "on",
          "accept": ".pdf", "properties": { "type": "s3", "size": "small" } }
      ]}),
      &signed_in(),
    );

    assert_eq!(
      form.field("upload").unwrap().control,
      Control::File(FileControl {
        multiple: true,
        accept: Some(".pdf".to_string()),
        size: Some("small".to_string()),
        deferred_upload: true,
      })
    );
  }

  #[test]
  fn test_unknown_type_renders_placeholder() {
    let form = render(
      json!({ "components": [
        { "id": "x", "type": "signature" },
        { "id": "y", "type": "textfield" }
      ]}),
      &signed_in(),
    );

    assert_eq!(
      form.field("x").unwrap().control,
      Control::Unsupported {
        type_name: "signature".to_string(),
        reason: None,
      }
    );
    assert!(matches!(form.field("y").unwrap().control, Control::Text(_)));
  }

  #[test]
  fn test_buttons() {
    let components = json!({ "components": [
      { "id": "go", "type": "button", "action": "submit", "label": "Go" },
      { "id": "back", "type": "button", "label": "Back",
        "properties": { "value": "back", "name": "nav" } },
      { "id": "docs", "type": "button", "label": "Docs",
        "properties": { "href": "https://example.com/${form_name}", "target": "_blank" } }
    ]});

    let form = render(components.clone(), &signed_in());
    assert!(!form.needs_default_submit);

    match &form.field("go").unwrap().control {
      Control::Button(button) => {
        assert_eq!(button.caption, "Go");
        assert_eq!(button.behavior, ButtonBehavior::Submit);
        assert_eq!(button.variant, "primary");
      }
      other => panic!("unexpected {:?}", other),
    }

    let back = form.field("back").unwrap();
    assert_eq!(back.name.as_deref(), Some("nav"));
    match &back.control {
      Control::Button(button) => {
        assert_eq!(button.behavior, ButtonBehavior::Cancel);
        assert_eq!(button.value.as_deref(), Some("back"));
        assert_eq!(button.variant, "secondary");
      }
      other => panic!("unexpected {:?}", other),
    }

    match &form.field("docs").unwrap().control {
      Control::Button(button) => assert_eq!(
        button.behavior,
        ButtonBehavior::Link {
          href: "https://example.com/Ada".to_string(),
          target: Some("_blank".to_string())
        }
      ),
      other => panic!("unexpected {:?}", other),
    }

    let anonymous = render(components, &HostContext::new());
    match &anonymous.field("go").unwrap().control {
      Control::Button(button) => assert_eq!(button.caption, LOGIN_CAPTION),
      other => panic!("unexpected {:?}", other),
    }
  }

  #[test]
  fn test_needs_default_submit_without_submit_control() {
    let form = render(
      json!({ "components": [ { "id": "a", "type": "textfield" } ]}),
      &signed_in(),
    );
    assert!(form.needs_default_submit);
  }

  #[test]
  fn test_dashboard_group_replaces_children() {
    let form = render(
      json!({ "components": [
        { "id": "d", "type": "group", "properties": { "type": "dashboard", "slug": "tvl" },
          "components": [ { "id": "hidden", "type": "textfield" } ] }
      ]}),
      &signed_in(),
    );

    assert_eq!(
      form.field("d").unwrap().control,
      Control::Dashboard {
        slug: "tvl".to_string(),
        params: Default::default()
      }
    );
    assert!(form.field("hidden").is_none());
  }

  #[test]
  fn test_datetime_uses_date_label() {
    let form = render(
      json!({ "components": [
        { "id": "when", "type": "datetime", "dateLabel": "Pick a day, ${form_name}", "subtype": "datetime" }
      ]}),
      &signed_in(),
    );

    let field = form.field("when").unwrap();
    assert_eq!(field.label.as_deref(), Some("Pick a day, Ada"));
    assert!(matches!(
      field.control,
      Control::DateTime {
        subtype: taskform_form::DateSubtype::DateTime,
        ..
      }
    ));
  }

  #[test]
  fn test_widget_name_defaults_to_kind() {
    let form = render(
      json!({ "components": [
        { "id": "w", "type": "textfield", "properties": { "type": "wallet" } }
      ]}),
      &signed_in(),
    );

    let field = form.field("w").unwrap();
    assert_eq!(field.name.as_deref(), Some("wallet"));
    assert!(matches!(&field.control, Control::Widget(w) if w.widget == "wallet"));
  }
}
