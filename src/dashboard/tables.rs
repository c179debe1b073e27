//! The filtered transaction list for the dashboard page.

use maud::{Markup, html};

use crate::{
    category::{Category, category_color},
    currency::{Currency, format_amount},
    endpoints,
    html::{BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_ROW_STYLE},
    transaction::{Transaction, TransactionKind},
};

/// Renders the list of filtered transactions with delete controls.
pub(super) fn transaction_list(
    transactions: &[&Transaction],
    user_categories: &[Category],
    currency: Currency,
) -> Markup {
    html!(
        div class="bg-white dark:bg-gray-800 p-6 rounded-xl shadow-lg w-full"
        {
            h2 class="text-xl font-semibold mb-4 text-gray-700 dark:text-gray-200"
            {
                "Transactions (" (transactions.len()) " found)"
            }

            @if transactions.is_empty() {
                p class="text-gray-500 italic p-4 text-center border border-dashed rounded-lg"
                {
                    "No transactions match the current filters."
                }
            } @else {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    tbody
                    {
                        @for transaction in transactions {
                            (transaction_row(transaction, user_categories, currency))
                        }
                    }
                }
            }
        }
    )
}

fn transaction_row(
    transaction: &Transaction,
    user_categories: &[Category],
    currency: Currency,
) -> Markup {
    let badge_color =
        category_color(transaction.kind, &transaction.category, user_categories).badge_class();
    let (amount_sign, amount_style) = match transaction.kind {
        TransactionKind::Income => ("+", "font-semibold text-green-600"),
        TransactionKind::Expense => ("-", "font-semibold text-red-600"),
    };
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                span class={ (CATEGORY_BADGE_STYLE) " " (badge_color) }
                {
                    (transaction.category)
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                p class="font-medium text-gray-800 dark:text-gray-200 text-sm"
                {
                    @if transaction.description.is_empty() {
                        "N/A"
                    } @else {
                        (transaction.description)
                    }
                }

                p class="text-xs text-gray-400" { (transaction.date) }
            }

            td class={ (TABLE_CELL_STYLE) " text-right" }
            {
                span class=(amount_style)
                {
                    (amount_sign) " " (format_amount(transaction.amount, currency))
                }
            }

            td class={ (TABLE_CELL_STYLE) " text-right" }
            {
                button
                    hx-delete=(delete_url)
                    hx-confirm={
                        "Delete this " (transaction.kind.as_str()) " of "
                        (format_amount(transaction.amount, currency)) "? \
                        This cannot be undone."
                    }
                    hx-target="closest tr"
                    hx-target-error="#alert-container"
                    hx-swap="delete"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    )
}
