use crate::models::filters::FilterPlan;
use sqlx::{MySql, QueryBuilder};

/// Appends `ORDER BY` and `LIMIT`/`OFFSET` for `plan`. `order_column` is the
/// creation timestamp the order filter sorts on; `id_column` breaks ties and
/// orders the query when no order was asked for.
pub fn push_filter_plan(
    query: &mut QueryBuilder<'_, MySql>,
    plan: &FilterPlan,
    order_column: &str,
    id_column: &str,
) {
    match plan.order {
        Some(direction) => {
            let direction = direction.as_sql();
            query.push(format!(
                " ORDER BY {order_column} {direction}, {id_column} {direction}"
            ));
        }
        None => {
            query.push(format!(" ORDER BY {id_column} ASC"));
        }
    }

    if let Some(pagination) = plan.pagination {
        query.push(" LIMIT ");
        query.push_bind(pagination.per_page);
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());
    } else if let Some(limit) = plan.limit {
        query.push(" LIMIT ");
        query.push_bind(limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filters::{Filters, SortDirection};

    fn render(filters: Filters) -> String {
        let mut query = QueryBuilder::<MySql>::new("SELECT m.id FROM messages m");
        push_filter_plan(&mut query, &filters.plan(), "m.created_at", "m.id");
        query.sql().to_owned()
    }

    #[test]
    fn no_filters_orders_by_id() {
        assert_eq!(
            render(Filters::new()),
            "SELECT m.id FROM messages m ORDER BY m.id ASC"
        );
    }

    #[test]
    fn order_is_rendered_before_limit_whatever_the_filter_order() {
        let sql = render(Filters::new().limit(5).order_by(SortDirection::Desc));
        assert_eq!(
            sql,
            "SELECT m.id FROM messages m ORDER BY m.created_at DESC, m.id DESC LIMIT ?"
        );
    }

    #[test]
    fn pagination_renders_offset() {
        let sql = render(Filters::new().paginate(10).page(2));
        assert!(sql.ends_with("ORDER BY m.id ASC LIMIT ? OFFSET ?"));
    }

    #[test]
    fn paginate_short_circuits_later_order() {
        let sql = render(Filters::new().paginate(10).order_by(SortDirection::Desc));
        assert!(!sql.contains("created_at"));
    }
}
