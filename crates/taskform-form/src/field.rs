use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use taskform_config::ValueOption;

use crate::form::FieldId;

/// A resolved field in a locked form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
  /// Editor-assigned component id.
  pub field_id: String,
  /// Variable the field binds to.
  pub key: Option<String>,
  pub label: Option<String>,
  pub description: Option<String>,
  pub kind: FieldKind,
  pub layout: Layout,
  pub required: bool,
  pub disabled: bool,
  pub read_only: bool,
  pub default_value: Option<serde_json::Value>,
  pub properties: HashMap<String, String>,
}

impl Field {
  pub fn new(field_id: impl Into<String>, kind: FieldKind) -> Self {
    Self {
      field_id: field_id.into(),
      key: None,
      label: None,
      description: None,
      kind,
      layout: Layout::default(),
      required: false,
      disabled: false,
      read_only: false,
      default_value: None,
      properties: HashMap::new(),
    }
  }

  pub fn property(&self, name: &str) -> Option<&str> {
    self
      .properties
      .get(name)
      .map(String::as_str)
      .filter(|v| !v.is_empty())
  }

  pub fn is_group(&self) -> bool {
    matches!(self.kind, FieldKind::Group(_))
  }

  /// Children of a group field; empty for every other kind.
  pub fn children(&self) -> &[FieldId] {
    match &self.kind {
      FieldKind::Group(group) => &group.children,
      _ => &[],
    }
  }
}

/// Grid placement of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
  pub row: Option<String>,
  pub columns: Option<u32>,
}

/// The type of a resolved field, one case per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
  TextField(TextInput),
  TextArea(TextInput),
  Number(NumberInput),
  DateTime(DateInput),
  Select(Choice),
  Checklist(Choice),
  Radio(Choice),
  Checkbox {
    /// Value submitted when checked.
    value: Option<String>,
  },
  FilePicker(FileInput),
  Group(Group),
  Button(ButtonSpec),
  Markdown {
    text: String,
  },
  Html {
    content: String,
  },
  Image {
    source: Option<String>,
  },
  IFrame {
    url: Option<String>,
    height: u32,
  },
  Separator,
  Spacer,
  Widget(WidgetKind),
  /// A component type taskform does not know. Kept so it can be rendered
  /// as a visible placeholder.
  Unknown {
    type_name: String,
  },
  /// A component whose definition could not be read.
  Invalid {
    type_name: String,
    reason: String,
  },
}

impl FieldKind {
  /// Short lower-case name used in logs and placeholders.
  pub fn name(&self) -> &str {
    match self {
      FieldKind::TextField(_) => "textfield",
      FieldKind::TextArea(_) => "textarea",
      FieldKind::Number(_) => "number",
      FieldKind::DateTime(_) => "datetime",
      FieldKind::Select(_) => "select",
      FieldKind::Checklist(_) => "checklist",
      FieldKind::Radio(_) => "radio",
      FieldKind::Checkbox { .. } => "checkbox",
      FieldKind::FilePicker(_) => "filepicker",
      FieldKind::Group(_) => "group",
      FieldKind::Button(_) => "button",
      FieldKind::Markdown { .. } => "text",
      FieldKind::Html { .. } => "html",
      FieldKind::Image { .. } => "image",
      FieldKind::IFrame { .. } => "iframe",
      FieldKind::Separator => "separator",
      FieldKind::Spacer => "spacer",
      FieldKind::Widget(_) => "custom",
      FieldKind::Unknown { type_name } | FieldKind::Invalid { type_name, .. } => type_name,
    }
  }
}

/// Attributes of single and multi line text inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextInput {
  pub format: TextFormat,
  pub min_length: Option<u32>,
  pub max_length: Option<u32>,
  pub pattern: Option<String>,
  pub placeholder: Option<String>,
  pub prefix: Option<String>,
  pub suffix: Option<String>,
  pub size: Option<String>,
}

/// How a text input is presented and validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextFormat {
  #[default]
  Plain,
  Email,
  Phone,
  Markdown,
  /// An explicit input type set through `properties.type`.
  Custom(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberInput {
  pub min: Option<f64>,
  pub max: Option<f64>,
  pub placeholder: Option<String>,
  pub prefix: Option<String>,
  pub suffix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateInput {
  pub date_label: Option<String>,
  pub subtype: DateSubtype,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSubtype {
  #[default]
  Date,
  Time,
  DateTime,
}

/// Options of select, checklist and radio fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
  pub options: Vec<ValueOption>,
  pub style: ChoiceStyle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceStyle {
  #[default]
  Standard,
  /// Options are colors rendered as swatches.
  Color,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileInput {
  pub multiple: bool,
  pub accept: Option<String>,
  pub size: Option<String>,
  /// The upload completes asynchronously after selection; the value is
  /// unknown until it does.
  pub deferred_upload: bool,
}

/// A group field and its ordered children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
  pub show_outline: bool,
  pub max_width: Option<String>,
  /// When set the group shows this dashboard instead of its children.
  pub dashboard: Option<String>,
  pub children: Vec<FieldId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonSpec {
  pub action: ButtonAction,
  /// Completes the task immediately with only this button's value.
  pub cancels: bool,
  pub name: Option<String>,
  pub value: Option<String>,
  pub href: Option<String>,
  pub target: Option<String>,
  pub variant: Option<String>,
  pub size: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
  Submit,
  Reset,
  #[default]
  Plain,
}

/// Embedded widgets provided by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
  Token,
  Nft,
  Wallet,
  Custom(String),
}

impl WidgetKind {
  pub fn name(&self) -> &str {
    match self {
      WidgetKind::Token => "token",
      WidgetKind::Nft => "nft",
      WidgetKind::Wallet => "wallet",
      WidgetKind::Custom(name) => name,
    }
  }
}
