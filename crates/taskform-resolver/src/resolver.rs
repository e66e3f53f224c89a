use std::collections::HashSet;

use taskform_config::{FieldDef, FormDef};
use taskform_form::{
  ButtonAction, ButtonSpec, Choice, ChoiceStyle, DateInput, DateSubtype, Field, FieldId,
  FieldKind, FileInput, Form, FormBuilder, Group, Layout, NumberInput, TextFormat, TextInput,
  WidgetKind,
};

use crate::error::ResolveError;

/// Pattern applied to text fields validated as phone numbers.
pub const PHONE_PATTERN: &str = r"([+]?\d{1,2}[-\s]?|)\d{3}[-\s]?\d{3}[-\s]?\d{4}";

/// Default iframe height in pixels.
const IFRAME_HEIGHT: u32 = 300;

/// Text inputs whose `properties.type` selects a host widget instead.
const WIDGET_TYPES: &[&str] = &["token", "nft", "wallet"];

/// Resolver transforms a FormDef into a locked Form.
pub trait Resolver {
  /// Resolve a form definition into a locked form.
  ///
  /// This process:
  /// 1. Gives every field a unique id, deriving one where it is missing or
  ///    already taken
  /// 2. Maps every component type onto a typed field kind; a component that
  ///    could not be read becomes [`FieldKind::Invalid`]
  /// 3. Builds the arena tree, placing group children under their group
  fn resolve(&self, def: FormDef) -> Result<Form, ResolveError>;
}

/// Standard resolver for form-js style component trees.
#[derive(Debug, Default, Clone)]
pub struct StandardResolver;

impl StandardResolver {
  pub fn new() -> Self {
    Self
  }

  /// Add a field and, for groups, its whole subtree. Returns the field's id.
  fn resolve_field(
    &self,
    builder: &mut FormBuilder,
    mut def: FieldDef,
    ids: &mut FieldIds,
  ) -> Result<FieldId, ResolveError> {
    def.id = ids.assign(&def);

    let children = std::mem::take(&mut def.components);
    let field = self.resolve_leaf(def);
    let is_group = field.is_group();
    let id = builder.add(field);

    if is_group {
      for child_def in children {
        let child = self.resolve_field(builder, child_def, ids)?;
        builder.attach(id, child)?;
      }
    }

    Ok(id)
  }

  /// Build a field from its definition, without children.
  fn resolve_leaf(&self, def: FieldDef) -> Field {
    let kind = self.resolve_kind(&def);
    let validate = def.validate.unwrap_or_default();

    Field {
      field_id: def.id,
      key: def.key,
      label: def.label,
      description: def.description,
      kind,
      layout: def
        .layout
        .map(|l| Layout {
          row: l.row.filter(|r| !r.is_empty()),
          columns: l.columns,
        })
        .unwrap_or_default(),
      required: validate.required.is_set(),
      disabled: def.disabled.is_set(),
      read_only: def.readonly.is_set(),
      default_value: def.default_value,
      properties: def.properties,
    }
  }

  fn resolve_kind(&self, def: &FieldDef) -> FieldKind {
    if let Some(reason) = &def.malformed {
      tracing::warn!(
        field_id = %def.id,
        type_name = %def.field_type,
        reason = %reason,
        "unreadable component"
      );
      return FieldKind::Invalid {
        type_name: def.field_type.clone(),
        reason: reason.clone(),
      };
    }

    let property_type = def.property("type");

    match def.field_type.as_str() {
      "textfield" | "text-field" | "textarea" => {
        if let Some(widget) = property_type.filter(|t| WIDGET_TYPES.contains(t)) {
          return FieldKind::Widget(widget_kind(widget));
        }
        let input = self.resolve_text_input(def);
        if def.field_type == "textarea" {
          FieldKind::TextArea(input)
        } else {
          FieldKind::TextField(input)
        }
      }
      "number" => {
        let validate = def.validate.clone().unwrap_or_default();
        let appearance = def.appearance.clone().unwrap_or_default();
        FieldKind::Number(NumberInput {
          min: validate.min,
          max: validate.max,
          placeholder: def.property("placeholder").map(String::from),
          prefix: appearance.prefix_adorner,
          suffix: appearance.suffix_adorner,
        })
      }
      "datetime" | "date" => FieldKind::DateTime(DateInput {
        date_label: def.date_label.clone(),
        subtype: match def.subtype.as_deref() {
          Some("time") => DateSubtype::Time,
          Some("datetime") => DateSubtype::DateTime,
          _ => DateSubtype::Date,
        },
      }),
      "select" => FieldKind::Select(Choice {
        options: def.values.clone(),
        style: ChoiceStyle::Standard,
      }),
      "checklist" | "radio" => {
        let choice = Choice {
          options: def.values.clone(),
          style: if property_type == Some("color") {
            ChoiceStyle::Color
          } else {
            ChoiceStyle::Standard
          },
        };
        if def.field_type == "radio" {
          FieldKind::Radio(choice)
        } else {
          FieldKind::Checklist(choice)
        }
      }
      "checkbox" => FieldKind::Checkbox {
        value: def.property("value").map(String::from),
      },
      "filepicker" | "file" => FieldKind::FilePicker(FileInput {
        multiple: def.multiple.is_set(),
        accept: def.accept.clone(),
        size: def.property("size").map(String::from),
        deferred_upload: property_type == Some("s3"),
      }),
      "group" => FieldKind::Group(Group {
        show_outline: def.show_outline.is_set(),
        max_width: def.property("maxWidth").map(String::from),
        dashboard: (property_type == Some("dashboard"))
          .then(|| def.property("slug").unwrap_or_default().to_string()),
        children: Vec::new(),
      }),
      "button" => FieldKind::Button(ButtonSpec {
        action: match def.action.as_deref() {
          Some("submit") => ButtonAction::Submit,
          Some("reset") => ButtonAction::Reset,
          _ if property_type == Some("submit") => ButtonAction::Submit,
          _ => ButtonAction::Plain,
        },
        cancels: property_type == Some("cancel") || def.property("value") == Some("back"),
        name: def.property("name").map(String::from),
        value: def.property("value").map(String::from),
        href: def.property("href").map(String::from),
        target: def.property("target").map(String::from),
        variant: def.property("variant").map(String::from),
        size: def.property("size").map(String::from),
      }),
      "text" | "display" | "message" | "markdown" => FieldKind::Markdown {
        text: def.text.clone().unwrap_or_default(),
      },
      "html" | "markup" => FieldKind::Html {
        content: def.content.clone().unwrap_or_default(),
      },
      "image" => FieldKind::Image {
        source: def.source.clone(),
      },
      "iframe" => FieldKind::IFrame {
        url: def.url.clone(),
        height: def.height.filter(|h| *h > 0).unwrap_or(IFRAME_HEIGHT),
      },
      "separator" => FieldKind::Separator,
      "spacer" => FieldKind::Spacer,
      "custom" => FieldKind::Widget(widget_kind(property_type.unwrap_or("custom"))),
      other => FieldKind::Unknown {
        type_name: other.to_string(),
      },
    }
  }

  fn resolve_text_input(&self, def: &FieldDef) -> TextInput {
    let validate = def.validate.clone().unwrap_or_default();
    let is_textfield = def.field_type != "textarea";
    let property_type = def.property("type");

    let format = if property_type == Some("markdown") {
      TextFormat::Markdown
    } else if !is_textfield {
      TextFormat::Plain
    } else {
      match validate.validation_type.as_deref() {
        Some("email") => TextFormat::Email,
        Some("phone") => TextFormat::Phone,
        _ => property_type
          .map(|t| TextFormat::Custom(t.to_string()))
          .unwrap_or_default(),
      }
    };

    let pattern = if format == TextFormat::Phone {
      Some(PHONE_PATTERN.to_string())
    } else {
      validate.pattern
    };

    let appearance = def.appearance.clone().unwrap_or_default();

    TextInput {
      format,
      min_length: validate.min_length,
      max_length: validate.max_length,
      pattern,
      placeholder: def.property("placeholder").map(String::from),
      prefix: appearance.prefix_adorner.filter(|_| is_textfield),
      suffix: appearance.suffix_adorner.filter(|_| is_textfield),
      size: def.property("size").filter(|_| is_textfield).map(String::from),
    }
  }
}

/// Hands out field ids in document order.
///
/// Explicit ids are reserved up front so a derived id never takes one that
/// appears later in the tree.
struct FieldIds {
  position: usize,
  reserved: HashSet<String>,
  assigned: HashSet<String>,
}

impl FieldIds {
  fn new(components: &[FieldDef]) -> Self {
    fn reserve(components: &[FieldDef], reserved: &mut HashSet<String>) {
      for def in components {
        if !def.id.is_empty() {
          reserved.insert(def.id.clone());
        }
        reserve(&def.components, reserved);
      }
    }

    let mut reserved = HashSet::new();
    reserve(components, &mut reserved);
    Self {
      position: 0,
      reserved,
      assigned: HashSet::new(),
    }
  }

  /// The field's own id when it is set and not yet taken, otherwise
  /// `{type}_{position}`.
  fn assign(&mut self, def: &FieldDef) -> String {
    self.position += 1;

    if !def.id.is_empty() && self.assigned.insert(def.id.clone()) {
      return def.id.clone();
    }

    let base = format!(
      "{}_{}",
      if def.field_type.is_empty() { "field" } else { def.field_type.as_str() },
      self.position
    );
    let mut id = base.clone();
    let mut suffix = 1;
    while self.reserved.contains(&id) || !self.assigned.insert(id.clone()) {
      suffix += 1;
      id = format!("{base}_{suffix}");
    }

    if !def.id.is_empty() {
      tracing::warn!(field_id = %def.id, derived = %id, "duplicate field id");
    }
    id
  }
}

fn widget_kind(name: &str) -> WidgetKind {
  match name {
    "token" => WidgetKind::Token,
    "nft" => WidgetKind::Nft,
    "wallet" => WidgetKind::Wallet,
    other => WidgetKind::Custom(other.to_string()),
  }
}

impl Resolver for StandardResolver {
  fn resolve(&self, def: FormDef) -> Result<Form, ResolveError> {
    let mut ids = FieldIds::new(&def.components);
    let mut builder = FormBuilder::new().with_form_id(def.id);
    for component in def.components {
      let id = self.resolve_field(&mut builder, component, &mut ids)?;
      builder.push_root(id)?;
    }

    Ok(builder.build()?)
  }
}
