//! 页面渲染：视图数据 -> HTML 字符串
//!
//! 纯函数，不访问存储；所有插值文本都经过转义。

use super::model::Product;

pub enum View<'a> {
    /// 商品列表与分类导航
    Index {
        products: &'a [Product],
        categories: &'a [String],
        current_category: Option<&'a str>,
    },
    Detail {
        product: &'a Product,
    },
    /// `product` 为 None 时是新建表单，否则是编辑表单
    Form {
        product: Option<&'a Product>,
    },
}

impl View<'_> {
    pub fn title(&self) -> String {
        match self {
            View::Index { .. } => "Product Catalogue".to_string(),
            View::Detail { product } => product.name.clone(),
            View::Form { product: None } => "Add Product".to_string(),
            View::Form {
                product: Some(product),
            } => format!("Edit {}", product.name),
        }
    }
}

pub fn render(view: &View<'_>, base_path: &str) -> String {
    let content = match view {
        View::Index {
            products,
            categories,
            current_category,
        } => render_index(products, categories, *current_category, base_path),
        View::Detail { product } => render_detail(product, base_path),
        View::Form { product } => render_form(*product, base_path),
    };
    layout(&view.title(), &content, base_path)
}

/// 列表页地址；挂载在根路径时为 `/`
pub fn list_url(base_path: &str) -> String {
    if base_path.is_empty() {
        "/".to_string()
    } else {
        base_path.to_string()
    }
}

pub fn product_url(base_path: &str, product: &Product) -> String {
    format!("{}/product/{}", base_path, product.id)
}

fn layout(title: &str, content: &str, base_path: &str) -> String {
    let home = escape(&list_url(base_path));
    let base = escape(base_path);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title} | Catalogue</title>
  <link rel="stylesheet" href="{base}/static/style.css">
</head>
<body>
  <header class="site-header">
    <a class="brand" href="{home}">Product Catalogue</a>
    <nav>
      <a href="{home}">Products</a>
      <a class="button" href="{base}/new">Add Product</a>
    </nav>
  </header>
  <main class="container">
{content}
  </main>
  <script src="{base}/static/main.js"></script>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn render_index(
    products: &[Product],
    categories: &[String],
    current_category: Option<&str>,
    base_path: &str,
) -> String {
    let home = list_url(base_path);
    let mut html = String::new();

    html.push_str("    <h1>Product Catalogue</h1>\n");
    html.push_str("    <nav class=\"categories\">\n");
    html.push_str(&format!(
        "      <a href=\"{}\"{}>All</a>\n",
        escape(&home),
        active_class(current_category.is_none())
    ));
    for category in categories {
        let href = format!("{}?category={}", home, encode_query_value(category));
        html.push_str(&format!(
            "      <a href=\"{}\"{}>{}</a>\n",
            escape(&href),
            active_class(current_category == Some(category.as_str())),
            escape(category)
        ));
    }
    html.push_str("    </nav>\n");

    if products.is_empty() {
        html.push_str("    <p class=\"empty\">No products found.</p>\n");
        return html;
    }

    html.push_str("    <div class=\"product-grid\">\n");
    for product in products {
        let href = escape(&product_url(base_path, product));
        html.push_str(&format!(
            r#"      <article class="product-card">
        <a href="{href}"><img src="{image}" alt="{name}"></a>
        <div class="product-body">
          <h2><a href="{href}">{name}</a></h2>
          <span class="category">{category}</span>
          <p class="price">${price}</p>
          <p class="stock">{stock}</p>
        </div>
      </article>
"#,
            image = escape(&product.image),
            name = escape(&product.name),
            category = escape(&product.category),
            price = format_price(product.price),
            stock = stock_label(product.stock),
        ));
    }
    html.push_str("    </div>\n");
    html
}

fn render_detail(product: &Product, base_path: &str) -> String {
    let href = escape(&product_url(base_path, product));
    let category_href = format!(
        "{}?category={}",
        list_url(base_path),
        encode_query_value(&product.category)
    );
    let added = product
        .id
        .created_at()
        .map(|t| {
            format!(
                "\n        <p class=\"added\">Added {}</p>",
                t.format("%Y-%m-%d %H:%M")
            )
        })
        .unwrap_or_default();

    format!(
        r#"    <a class="back" href="{home}">&larr; Back to products</a>
    <article class="product-detail">
      <img src="{image}" alt="{name}">
      <div class="product-body">
        <h1>{name}</h1>
        <a class="category" href="{category_href}">{category}</a>
        <p class="description">{description}</p>
        <p class="price">${price}</p>
        <p class="stock">{stock}</p>{added}
        <div class="actions">
          <a class="button" href="{href}/edit">Edit</a>
          <form method="post" action="{href}/delete" class="delete-form">
            <button type="submit" class="button danger">Delete</button>
          </form>
        </div>
      </div>
    </article>
"#,
        home = escape(&list_url(base_path)),
        image = escape(&product.image),
        name = escape(&product.name),
        category_href = escape(&category_href),
        category = escape(&product.category),
        description = escape(&product.description),
        price = format_price(product.price),
        stock = stock_label(product.stock),
    )
}

fn render_form(product: Option<&Product>, base_path: &str) -> String {
    let (heading, action, submit, cancel) = match product {
        None => (
            "Add Product".to_string(),
            list_url(base_path),
            "Create Product",
            list_url(base_path),
        ),
        Some(p) => (
            format!("Edit {}", p.name),
            product_url(base_path, p),
            "Save Changes",
            product_url(base_path, p),
        ),
    };

    let name = product.map(|p| p.name.as_str()).unwrap_or_default();
    let description = product.map(|p| p.description.as_str()).unwrap_or_default();
    let price = product.map(|p| format_price(p.price)).unwrap_or_default();
    let category = product.map(|p| p.category.as_str()).unwrap_or_default();
    let stock = product.map(|p| p.stock.to_string()).unwrap_or_default();
    let image = product.map(|p| p.image.as_str()).unwrap_or_default();

    format!(
        r#"    <h1>{heading}</h1>
    <form method="post" action="{action}" class="product-form">
      <label for="name">Name</label>
      <input id="name" name="name" type="text" value="{name}" required>
      <label for="description">Description</label>
      <textarea id="description" name="description" rows="4" required>{description}</textarea>
      <label for="price">Price</label>
      <input id="price" name="price" type="number" step="0.01" min="0.01" value="{price}" required>
      <label for="category">Category</label>
      <input id="category" name="category" type="text" value="{category}" required>
      <label for="stock">Stock</label>
      <input id="stock" name="stock" type="number" step="1" min="0" value="{stock}" required>
      <label for="image">Image URL</label>
      <input id="image" name="image" type="url" value="{image}" placeholder="Leave blank for a placeholder">
      <div class="actions">
        <button type="submit" class="button">{submit}</button>
        <a href="{cancel}">Cancel</a>
      </div>
    </form>
"#,
        heading = escape(&heading),
        action = escape(&action),
        name = escape(name),
        description = escape(description),
        price = price,
        category = escape(category),
        stock = stock,
        image = escape(image),
        submit = submit,
        cancel = escape(&cancel),
    )
}

fn active_class(active: bool) -> &'static str {
    if active {
        " class=\"active\""
    } else {
        ""
    }
}

fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

fn stock_label(stock: i64) -> String {
    if stock > 0 {
        format!("{} in stock", stock)
    } else {
        "Out of stock".to_string()
    }
}

/// HTML 文本与属性值转义
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// 查询参数值的百分号编码（RFC 3986 非保留字符原样保留）
fn encode_query_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::catalogue::model::{ProductFields, ProductId};

    fn product(name: &str, category: &str) -> Product {
        let mut fields = ProductFields::new(name, "A fine thing", 19.5, category, 3);
        fields.image = "https://img.example/p.png".to_string();
        Product::from_parts(
            "65a1b2c3d4e5f60718293a4b".parse::<ProductId>().unwrap(),
            fields,
        )
    }

    #[test]
    fn index_lists_products_and_categories() {
        let products = vec![product("Laptop", "electronics")];
        let categories = vec!["electronics".to_string(), "home & garden".to_string()];
        let html = render(
            &View::Index {
                products: &products,
                categories: &categories,
                current_category: Some("electronics"),
            },
            "/catalogue",
        );

        assert!(html.contains("<title>Product Catalogue | Catalogue</title>"));
        assert!(html.contains("href=\"/catalogue/product/65a1b2c3d4e5f60718293a4b\""));
        assert!(html.contains("href=\"/catalogue?category=electronics\" class=\"active\""));
        assert!(html.contains("href=\"/catalogue?category=home%20%26%20garden\""));
        assert!(html.contains(">home &amp; garden</a>"));
        assert!(html.contains("$19.50"));
        assert!(html.contains("/catalogue/static/style.css"));
    }

    #[test]
    fn index_without_products_shows_empty_state() {
        let html = render(
            &View::Index {
                products: &[],
                categories: &[],
                current_category: None,
            },
            "",
        );
        assert!(html.contains("No products found."));
        assert!(html.contains("<a href=\"/\" class=\"active\">All</a>"));
    }

    #[test]
    fn detail_escapes_fields() {
        let mut p = product("<script>alert(1)</script>", "toys");
        p.description = "\"quoted\" & 'single'".to_string();
        p.stock = 0;
        let html = render(&View::Detail { product: &p }, "/catalogue");

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&quot;quoted&quot; &amp; &#x27;single&#x27;"));
        assert!(html.contains("Out of stock"));
        assert!(html.contains("action=\"/catalogue/product/65a1b2c3d4e5f60718293a4b/delete\""));
        assert!(html.contains("Added 2024-01-12 21:44"));
    }

    #[test]
    fn new_form_posts_to_list() {
        let html = render(&View::Form { product: None }, "/catalogue");
        assert!(html.contains("<title>Add Product | Catalogue</title>"));
        assert!(html.contains("action=\"/catalogue\""));
        assert!(html.contains("Create Product"));
        assert!(html.contains("name=\"name\" type=\"text\" value=\"\""));
    }

    #[test]
    fn edit_form_is_prefilled() {
        let p = product("Desk", "furniture");
        let html = render(&View::Form { product: Some(&p) }, "/catalogue");
        assert!(html.contains("<title>Edit Desk | Catalogue</title>"));
        assert!(html.contains("action=\"/catalogue/product/65a1b2c3d4e5f60718293a4b\""));
        assert!(html.contains("value=\"Desk\""));
        assert!(html.contains("value=\"19.50\""));
        assert!(html.contains("value=\"3\""));
        assert!(html.contains(">A fine thing</textarea>"));
    }
}
