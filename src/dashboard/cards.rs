//! Summary cards for the dashboard page.

use maud::{Markup, html};

use crate::{
    currency::{Currency, format_amount},
    dashboard::aggregation::Totals,
    html::CARD_STYLE,
};

/// Renders the balance, total income, and total expense cards.
pub(super) fn summary_cards(totals: &Totals, currency: Currency) -> Markup {
    let balance = totals.balance();
    let balance_style = if balance >= 0.0 {
        "text-4xl font-extrabold text-green-600"
    } else {
        "text-4xl font-extrabold text-red-600"
    };

    html!(
        div class={ (CARD_STYLE) " border-t-4 border-blue-500 w-full" }
        {
            p class="text-sm font-medium text-gray-500 dark:text-gray-400 mb-2"
            {
                "Current Balance"
            }

            p class=(balance_style)
            {
                (format_amount(balance, currency))
            }
        }

        div class="grid grid-cols-2 gap-4 w-full"
        {
            div class={ (CARD_STYLE) " border-l-4 border-green-500" }
            {
                p class="text-sm font-medium text-gray-500 dark:text-gray-400"
                {
                    "Total Income"
                }

                p class="text-2xl font-bold text-green-500"
                {
                    (format_amount(totals.income, currency))
                }
            }

            div class={ (CARD_STYLE) " border-l-4 border-red-500" }
            {
                p class="text-sm font-medium text-gray-500 dark:text-gray-400"
                {
                    "Total Expense"
                }

                p class="text-2xl font-bold text-red-500"
                {
                    (format_amount(totals.expense, currency))
                }
            }
        }
    )
}
