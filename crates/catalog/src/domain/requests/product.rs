use serde::{Deserialize, Serialize};
use shared::errors::ServiceError;
use std::borrow::Cow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

/// Products shown per catalog page.
pub const PAGE_SIZE: i64 = 8;

pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindAllProducts {
    /// Case-insensitive text matched against name and description.
    #[serde(default)]
    pub search: Option<String>,

    /// 1-based page number; anything that is not a positive integer means 1.
    #[serde(default)]
    #[param(example = "1")]
    pub page: Option<String>,
}

impl FindAllProducts {
    /// Trimmed search text with NUL characters dropped; `None` when blank.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|term| term.replace('\0', ""))
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty())
    }

    pub fn current_page(&self) -> i64 {
        self.page
            .as_deref()
            .map(str::trim)
            .filter(|page| is_whole_integer(page))
            .and_then(parse_int_prefix)
            .filter(|page| *page >= 1)
            .unwrap_or(1)
    }

    pub fn to_filter(&self) -> ProductFilter {
        ProductFilter {
            search: self.search_term(),
            page: self.current_page(),
            page_size: PAGE_SIZE,
        }
    }
}

/// Resolved listing query handed to the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub page: i64,
    pub page_size: i64,
}

impl ProductFilter {
    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0).saturating_mul(self.page_size)
    }
}

/// A number that may arrive either as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    fn is_blank(&self) -> bool {
        matches!(self, NumericInput::Text(text) if text.trim().is_empty())
    }

    /// A JSON `0` or non-finite number counts as no value; the text `"0"` does not.
    fn is_falsy_number(&self) -> bool {
        matches!(self, NumericInput::Number(value) if *value == 0.0 || !value.is_finite())
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            NumericInput::Number(value) => Some(*value),
            NumericInput::Text(text) => parse_float_prefix(text),
        }
    }

    fn as_integer(&self) -> Option<i64> {
        match self {
            NumericInput::Number(value) if value.is_finite() => Some(value.trunc() as i64),
            NumericInput::Number(_) => None,
            NumericInput::Text(text) => parse_int_prefix(text),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(
        required(message = "Name is required"),
        length(min = 1, message = "Name is required")
    )]
    #[schema(example = "Linen Shirt")]
    pub name: Option<String>,

    #[schema(example = "Relaxed fit, breathable linen.")]
    pub description: Option<String>,

    #[validate(
        required(message = "Price is required"),
        custom(function = "validate_price")
    )]
    #[schema(example = "19.99")]
    pub price: Option<NumericInput>,

    #[schema(example = "https://example.com/shirt.jpg")]
    pub image: Option<String>,

    #[schema(example = "Tops")]
    pub category: Option<String>,

    #[validate(custom(function = "validate_stock"))]
    #[schema(example = "25")]
    pub stock: Option<NumericInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub id: Option<i32>,

    #[validate(
        required(message = "Name is required"),
        length(min = 1, message = "Name is required")
    )]
    #[schema(example = "Linen Shirt")]
    pub name: Option<String>,

    #[schema(example = "Relaxed fit, breathable linen.")]
    pub description: Option<String>,

    #[validate(
        required(message = "Price is required"),
        custom(function = "validate_price")
    )]
    #[schema(example = "24.5")]
    pub price: Option<NumericInput>,

    #[schema(example = "https://example.com/shirt.jpg")]
    pub image: Option<String>,

    #[schema(example = "Tops")]
    pub category: Option<String>,

    #[validate(custom(function = "validate_stock"))]
    #[schema(example = "10")]
    pub stock: Option<NumericInput>,
}

/// Fully coerced, storable product fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image: Option<String>,
    pub category: String,
    pub stock: i32,
}

impl TryFrom<&CreateProductRequest> for ProductDraft {
    type Error = ServiceError;

    fn try_from(req: &CreateProductRequest) -> Result<Self, Self::Error> {
        req.validate()
            .map_err(|errors| ServiceError::Validation(validation_messages(&errors)))?;

        draft_from_fields(
            req.name.as_deref(),
            req.description.as_deref(),
            req.price.as_ref(),
            req.image.as_deref(),
            req.category.as_deref(),
            req.stock.as_ref(),
        )
    }
}

impl TryFrom<&UpdateProductRequest> for ProductDraft {
    type Error = ServiceError;

    fn try_from(req: &UpdateProductRequest) -> Result<Self, Self::Error> {
        req.validate()
            .map_err(|errors| ServiceError::Validation(validation_messages(&errors)))?;

        draft_from_fields(
            req.name.as_deref(),
            req.description.as_deref(),
            req.price.as_ref(),
            req.image.as_deref(),
            req.category.as_deref(),
            req.stock.as_ref(),
        )
    }
}

fn draft_from_fields(
    name: Option<&str>,
    description: Option<&str>,
    price: Option<&NumericInput>,
    image: Option<&str>,
    category: Option<&str>,
    stock: Option<&NumericInput>,
) -> Result<ProductDraft, ServiceError> {
    let name = name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ServiceError::Validation(vec!["name: Name is required".into()]))?;

    let price = price
        .ok_or_else(|| ServiceError::Validation(vec!["price: Price is required".into()]))
        .and_then(|price| {
            coerce_price(price).map_err(|e| ServiceError::Validation(vec![format!("price: {e}")]))
        })?;

    let stock = coerce_stock(stock)
        .map_err(|e| ServiceError::Validation(vec![format!("stock: {e}")]))?;

    let category = category
        .filter(|category| !category.is_empty())
        .unwrap_or(DEFAULT_CATEGORY);

    Ok(ProductDraft {
        name: name.to_string(),
        description: description.map(str::to_string),
        price,
        image: image
            .map(str::trim)
            .filter(|image| !image.is_empty())
            .map(str::to_string),
        category: category.to_string(),
        stock,
    })
}

fn coerce_price(input: &NumericInput) -> Result<f64, &'static str> {
    if input.is_blank() || input.is_falsy_number() {
        return Err("Price is required");
    }

    let price = input
        .as_float()
        .filter(|price| price.is_finite())
        .ok_or("Price must be a number")?;

    if price < 0.0 {
        return Err("Price cannot be negative");
    }

    Ok(price)
}

fn coerce_stock(input: Option<&NumericInput>) -> Result<i32, &'static str> {
    let Some(stock) = input.and_then(NumericInput::as_integer) else {
        return Ok(0);
    };

    if stock < 0 {
        return Err("Stock cannot be negative");
    }

    i32::try_from(stock).map_err(|_| "Stock is too large")
}

fn validate_price(price: &NumericInput) -> Result<(), ValidationError> {
    coerce_price(price).map(|_| ()).map_err(|message| {
        ValidationError::new("price").with_message(Cow::Borrowed(message))
    })
}

fn validate_stock(stock: &NumericInput) -> Result<(), ValidationError> {
    coerce_stock(Some(stock)).map(|_| ()).map_err(|message| {
        ValidationError::new("stock").with_message(Cow::Borrowed(message))
    })
}

pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {field}"));
                format!("{field}: {message}")
            })
        })
        .collect();

    messages.sort();
    messages
}

/// Longest leading decimal literal of `input`, ignoring leading whitespace.
/// `"19.99"` → 19.99, `"12abc"` → 12, `"abc"` → None.
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let text = input.trim_start();
    let bytes = text.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok()
}

/// `true` when `input` is an optionally signed run of ASCII digits and nothing else.
fn is_whole_integer(input: &str) -> bool {
    let digits = input.strip_prefix(['+', '-']).unwrap_or(input);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Leading base-10 integer of `input`, saturating at the `i64` bounds.
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let text = input.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits: Vec<i64> = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|b| i64::from(b - b'0'))
        .collect();

    if digits.is_empty() {
        return None;
    }

    let value = digits.into_iter().fold(0i64, |acc, digit| {
        if negative {
            acc.saturating_mul(10).saturating_sub(digit)
        } else {
            acc.saturating_mul(10).saturating_add(digit)
        }
    });

    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Option<NumericInput> {
        Some(NumericInput::Text(value.to_string()))
    }

    fn create(name: Option<&str>, price: Option<NumericInput>) -> CreateProductRequest {
        CreateProductRequest {
            name: name.map(str::to_string),
            price,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_apply_when_category_and_stock_are_omitted() {
        let draft = ProductDraft::try_from(&create(Some("Tee"), text("19.99"))).unwrap();

        assert_eq!(draft.name, "Tee");
        assert_eq!(draft.price, 19.99);
        assert_eq!(draft.category, "General");
        assert_eq!(draft.stock, 0);
        assert_eq!(draft.image, None);
    }

    #[test]
    fn test_empty_category_falls_back_to_general() {
        let mut req = create(Some("Tee"), Some(NumericInput::Number(5.0)));
        req.category = Some(String::new());

        let draft = ProductDraft::try_from(&req).unwrap();
        assert_eq!(draft.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_stock_text_is_coerced_and_garbage_becomes_zero() {
        let mut req = create(Some("Tee"), text("10"));

        req.stock = text("12 pieces");
        assert_eq!(ProductDraft::try_from(&req).unwrap().stock, 12);

        req.stock = text("lots");
        assert_eq!(ProductDraft::try_from(&req).unwrap().stock, 0);

        req.stock = Some(NumericInput::Number(7.9));
        assert_eq!(ProductDraft::try_from(&req).unwrap().stock, 7);
    }

    #[test]
    fn test_negative_stock_is_rejected() {
        let mut req = create(Some("Tee"), text("10"));
        req.stock = text("-3");

        let err = ProductDraft::try_from(&req).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn test_missing_name_or_price_is_a_validation_error() {
        for req in [
            create(None, text("19.99")),
            create(Some(""), text("19.99")),
            create(Some("Tee"), None),
            create(Some("Tee"), text("   ")),
        ] {
            let err = ProductDraft::try_from(&req).unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{req:?}");
        }
    }

    #[test]
    fn test_non_numeric_or_negative_price_is_rejected() {
        for price in ["abc", "-1", "NaN"] {
            let err = ProductDraft::try_from(&create(Some("Tee"), text(price))).unwrap_err();
            match err {
                ServiceError::Validation(messages) => {
                    assert!(messages[0].starts_with("price:"), "{messages:?}")
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_numeric_zero_price_is_missing_but_text_zero_is_kept() {
        let err =
            ProductDraft::try_from(&create(Some("Sticker"), Some(NumericInput::Number(0.0))))
                .unwrap_err();
        match err {
            ServiceError::Validation(messages) => {
                assert_eq!(messages, vec!["price: Price is required".to_string()])
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let draft = ProductDraft::try_from(&create(Some("Sticker"), text("0"))).unwrap();
        assert_eq!(draft.price, 0.0);
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("19.99"), Some(19.99));
        assert_eq!(parse_float_prefix("  12abc"), Some(12.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("1e3x"), Some(1000.0));
        assert_eq!(parse_float_prefix("2e"), Some(2.0));
        assert_eq!(parse_float_prefix("-4.25"), Some(-4.25));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix(""), None);
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix(" 3.7"), Some(3));
        assert_eq!(parse_int_prefix("-8kg"), Some(-8));
        assert_eq!(parse_int_prefix("x1"), None);
        assert_eq!(parse_int_prefix("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_page_defaults_to_one() {
        let page = |value: Option<&str>| {
            FindAllProducts {
                search: None,
                page: value.map(str::to_string),
            }
            .current_page()
        };

        assert_eq!(page(None), 1);
        assert_eq!(page(Some("")), 1);
        assert_eq!(page(Some("abc")), 1);
        assert_eq!(page(Some("0")), 1);
        assert_eq!(page(Some("-2")), 1);
        assert_eq!(page(Some("3")), 3);
        assert_eq!(page(Some(" 4 ")), 4);
        assert_eq!(page(Some("12abc")), 1);
        assert_eq!(page(Some("2.5")), 1);
    }

    #[test]
    fn test_search_term_drops_nul_characters() {
        let term = |value: &str| {
            FindAllProducts {
                search: Some(value.to_string()),
                page: None,
            }
            .search_term()
        };

        assert_eq!(term("\0shirt\0"), Some("shirt".to_string()));
        assert_eq!(term("\0"), None);
    }

    #[test]
    fn test_filter_offset_and_blank_search() {
        let filter = FindAllProducts {
            search: Some("   ".into()),
            page: Some("2".into()),
        }
        .to_filter();

        assert_eq!(filter.search, None);
        assert_eq!(filter.offset(), 8);

        let far = FindAllProducts {
            search: Some(" shirt ".into()),
            page: Some("99999999999999999999".into()),
        }
        .to_filter();
        assert_eq!(far.search.as_deref(), Some("shirt"));
        assert_eq!(far.offset(), i64::MAX);
    }
}
