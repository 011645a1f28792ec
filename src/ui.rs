use crate::calendar::PickerConfig;
use crate::catalog::{self, CITIES};
use crate::filters::Dashboard;
use crate::format::group_thousands;
use crate::pagination::ITEMS_PER_PAGE_OPTIONS;
use crate::sample::{LATEST_SAVINGS_YEAR, SAVINGS_YEARS};
use chrono::NaiveDate;
use serde_json::{Value, json};

/// Element ids the page template emits for `page`.
pub fn element_ids(page: &str) -> Vec<&'static str> {
    picker_for(page)
        .map(|config| config.element_ids().to_vec())
        .unwrap_or_default()
}

fn picker_for(page: &str) -> Option<PickerConfig> {
    match page {
        "analytics" => Some(PickerConfig::ANALYTICS),
        "reports" => Some(PickerConfig::REPORTS),
        _ => None,
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_page(page: &str, dashboard: &Dashboard, today: NaiveDate) -> String {
    let filters = dashboard.filters();
    let body = match page {
        "analytics" => render_analytics(dashboard),
        "reports" => render_reports(dashboard),
        _ => render_home(dashboard, today),
    };

    PAGE_HTML
        .replace("{{NAV}}", &render_nav(page))
        .replace("{{CITY_OPTIONS}}", &render_city_options(&filters.city))
        .replace("{{SCHOOLS}}", &render_school_checkboxes(dashboard))
        .replace("{{CITY_LABEL}}", &escape_html(&city_label(dashboard)))
        .replace("{{BODY}}", &body)
        .replace("{{PICKERS}}", &picker_script_config(page))
        .replace("{{PAGE}}", page)
}

fn label_id(config: PickerConfig) -> &'static str {
    if config.id == PickerConfig::REPORTS.id {
        "reports-selected-date-text"
    } else {
        "selected-date-text"
    }
}

/// Element ids handed to the inline client, taken from the same config the
/// markup is rendered from.
fn picker_script_config(page: &str) -> String {
    let pickers: Vec<Value> = picker_for(page)
        .into_iter()
        .map(|config| {
            json!({
                "id": config.id,
                "trigger": config.trigger,
                "container": config.container,
                "prev": config.prev,
                "next": config.next,
                "month": config.month_label,
                "days": config.days,
                "apply": config.apply,
                "cancel": config.cancel,
                "status": config.status,
                "label": label_id(config),
            })
        })
        .collect();
    Value::Array(pickers).to_string()
}

fn city_label(dashboard: &Dashboard) -> String {
    let filters = dashboard.filters();
    match filters.selected_schools.len() {
        0 => filters.city.clone(),
        count => format!("{} ({count} школ)", filters.city),
    }
}

fn render_nav(active: &str) -> String {
    [("home", "Главная"), ("analytics", "Аналитика"), ("reports", "Отчёты")]
        .iter()
        .map(|(page, title)| {
            let class = if *page == active { "nav-link active" } else { "nav-link" };
            format!(r#"<a class="{class}" href="/?page={page}">{title}</a>"#)
        })
        .collect()
}

fn render_city_options(current: &str) -> String {
    CITIES
        .iter()
        .map(|city| {
            let selected = if city.name == current { " selected" } else { "" };
            format!(r#"<option value="{0}"{selected}>{0}</option>"#, escape_html(city.name))
        })
        .collect()
}

fn render_school_checkboxes(dashboard: &Dashboard) -> String {
    let filters = dashboard.filters();
    catalog::schools_for(&filters.city)
        .iter()
        .map(|school| {
            let checked = if filters.selected_schools.contains(&school.id) { " checked" } else { "" };
            format!(
                r#"<label class="school"><input type="checkbox" class="school-checkbox" value="{}"{checked}> {}</label>"#,
                school.id,
                escape_html(school.name)
            )
        })
        .collect()
}

fn render_picker(config: PickerConfig, label: Option<&str>) -> String {
    let label = escape_html(label.unwrap_or("Выберите период"));
    let label_id = label_id(config);
    format!(
        r#"<div class="picker" data-picker="{id}">
  <button type="button" class="trigger" id="{trigger}"><span id="{label_id}">{label}</span></button>
  <div class="calendar hidden" id="{container}">
    <div class="calendar-head">
      <button type="button" id="{prev}" aria-label="Предыдущий месяц">‹</button>
      <span id="{month_label}"></span>
      <button type="button" id="{next}" aria-label="Следующий месяц">›</button>
    </div>
    <div class="weekdays"><span>Пн</span><span>Вт</span><span>Ср</span><span>Чт</span><span>Пт</span><span>Сб</span><span>Вс</span></div>
    <div class="days" id="{days}"></div>
    <div class="range-display hidden"><span id="{status}"></span></div>
    <div class="calendar-actions">
      <button type="button" class="ghost" id="{cancel}">Отмена</button>
      <button type="button" class="primary" id="{apply}">Применить</button>
    </div>
  </div>
</div>"#,
        id = config.id,
        trigger = config.trigger,
        container = config.container,
        prev = config.prev,
        next = config.next,
        month_label = config.month_label,
        days = config.days,
        status = config.status,
        cancel = config.cancel,
        apply = config.apply,
    )
}

fn period_tabs(class: &str, periods: &[(&str, &str)], active: &str) -> String {
    periods
        .iter()
        .map(|(value, title)| {
            let state = if *value == active { " tab-active" } else { "" };
            format!(r#"<button type="button" class="{class}{state}" data-period="{value}">{title}</button>"#)
        })
        .collect()
}

fn render_home(dashboard: &Dashboard, today: NaiveDate) -> String {
    let filters = dashboard.filters();
    let formatter = dashboard.formatter();
    let schools = catalog::schools_by_ids(&filters.selected_schools);
    let years: String = SAVINGS_YEARS
        .iter()
        .map(|year| {
            let selected = if *year == LATEST_SAVINGS_YEAR { " selected" } else { "" };
            format!(r#"<option value="{year}"{selected}>{year}</option>"#)
        })
        .collect();
    format!(
        r#"<nav class="tabs">
  <button type="button" class="tab-active" id="summary-tab-btn">Сводка</button>
  <button type="button" id="budget-tab-btn">Бюджет</button>
</nav>
<section class="cards" id="summary-tab-content">
  <article class="card"><span class="label">Сегодня</span><span class="value">{today}</span></article>
  <article class="card"><span class="label">Город</span><span class="value">{city}</span></article>
  <article class="card"><span class="label">Школ выбрано</span><span class="value">{count}</span></article>
</section>
<section class="chart-card hidden" id="budget-tab-content">
  <div class="calendar-head">
    <h2>Экономия по месяцам</h2>
    <select id="year-selector">{years}</select>
  </div>
  <div class="chart" id="monthly-savings-chart"></div>
  <p class="label">Итого за год: <span id="savings-total"></span> ₸</p>
</section>"#,
        today = escape_html(&formatter.long(today)),
        city = escape_html(&filters.city),
        count = group_thousands(schools.len() as u64),
    )
}

fn render_analytics(dashboard: &Dashboard) -> String {
    let filters = dashboard.filters();
    let tabs = period_tabs(
        "period-tab",
        &[("day", "День"), ("yesterday", "Вчера"), ("week", "Неделя"), ("month", "Месяц")],
        filters.period.as_str(),
    );
    format!(
        r#"<section class="toolbar">
  <div class="tabs">{tabs}</div>
  {picker}
</section>
<section class="cards" id="summary-cards"></section>
<section class="charts">
  <article class="chart-card"><h2>Посещаемость</h2><div class="chart" id="attendance-chart"></div></article>
  <article class="chart-card"><h2>Питание</h2><div class="chart" id="nutrition-chart"></div></article>
  <article class="chart-card"><h2>Библиотека</h2><div class="chart" id="library-chart"></div></article>
</section>"#,
        picker = render_picker(PickerConfig::ANALYTICS, filters.date_label.as_deref()),
    )
}

fn render_reports(dashboard: &Dashboard) -> String {
    let filters = dashboard.filters();
    let tabs = period_tabs(
        "reports-period-tab",
        &[("day", "Сегодня"), ("yesterday", "Вчера"), ("week", "Неделя"), ("month", "Месяц")],
        filters.reports_period.as_str(),
    );
    let per_page: String = ITEMS_PER_PAGE_OPTIONS
        .iter()
        .map(|n| format!(r#"<option value="{n}">{n}</option>"#))
        .collect();
    format!(
        r#"<section class="toolbar">
  <div class="tabs">{tabs}</div>
  {picker}
  <input type="search" id="search-input" placeholder="Поиск по школе или ID">
</section>
<section class="table-wrap">
  <table>
    <thead>
      <tr><th>ID</th><th>Школа</th><th>1-4</th><th>5-11</th><th>Всего</th><th>Персонал</th>
      <th>Пришли 1-4</th><th>Пришли 5-11</th><th>Персонал</th><th>%</th>
      <th>Питание 1-4</th><th>Нет</th><th>%</th><th>Питание 5-11</th><th>Нет</th><th>%</th></tr>
    </thead>
    <tbody id="table-body"></tbody>
    <tfoot id="table-footer"></tfoot>
  </table>
</section>
<section class="pager">
  <p>Показано <span id="page-start">0</span>–<span id="page-end">0</span> из <span id="total-results">0</span></p>
  <select id="items-per-page">{per_page}</select>
  <nav id="pagination-nav"></nav>
</section>"#,
        picker = render_picker(PickerConfig::REPORTS, filters.reports_label.as_deref()),
    )
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="ru">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Школьная аналитика</title>
  <style>
    :root {
      --ink: #1f2937;
      --muted: #6b7280;
      --accent: #2563eb;
      --accent-soft: #dbeafe;
      --accent-mid: #60a5fa;
      --card: #ffffff;
      --line: #e5e7eb;
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      font-family: "Inter", "Segoe UI", sans-serif;
      color: var(--ink);
      background: #f3f4f6;
      display: grid;
      grid-template-columns: 220px 1fr;
      min-height: 100vh;
    }

    aside { background: #111827; padding: 24px 16px; display: grid; align-content: start; gap: 6px; }
    .nav-link { color: #d1d5db; text-decoration: none; padding: 10px 12px; border-radius: 10px; }
    .nav-link.active { background: var(--accent); color: white; }
    main { padding: 24px 32px; display: grid; gap: 20px; align-content: start; }
    header { display: flex; gap: 12px; align-items: center; flex-wrap: wrap; }
    .hidden { display: none !important; }
    .toolbar { display: flex; gap: 12px; align-items: center; flex-wrap: wrap; }
    .tabs { display: inline-flex; background: var(--line); border-radius: 10px; padding: 4px; }
    .tabs button { border: 0; background: transparent; padding: 8px 14px; border-radius: 8px; cursor: pointer; }
    .tabs .tab-active { background: white; color: var(--accent); }
    .cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 12px; }
    .card, .chart-card { background: var(--card); border-radius: 14px; padding: 16px; border: 1px solid var(--line); }
    .card .label { display: block; color: var(--muted); font-size: 0.85rem; }
    .card .value { display: block; font-size: 1.5rem; font-weight: 600; }
    .charts { display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 12px; }
    .chart-card h2 { margin: 0 0 12px; font-size: 1rem; }
    .picker { position: relative; }
    .trigger { border: 1px solid var(--line); background: white; border-radius: 10px; padding: 8px 14px; cursor: pointer; }
    .calendar { position: absolute; z-index: 10; top: 44px; left: 0; width: 300px; background: white; border-radius: 14px; border: 1px solid var(--line); padding: 12px; box-shadow: 0 12px 40px rgba(0,0,0,0.12); }
    .calendar-head { display: flex; justify-content: space-between; align-items: center; margin-bottom: 8px; }
    .weekdays, .days { display: grid; grid-template-columns: repeat(7, 1fr); gap: 2px; text-align: center; }
    .weekdays span { color: var(--muted); font-size: 0.75rem; }
    .days button { border: 0; background: transparent; padding: 8px 0; border-radius: 6px; cursor: pointer; }
    .days .today { outline: 1px solid var(--accent); }
    .days .selection_start { background: var(--accent); color: white; border-radius: 8px 0 0 8px; }
    .days .selection_end { background: var(--accent); color: white; border-radius: 0 8px 8px 0; }
    .days .in_range, .days .hover_in_range { background: var(--accent-soft); color: var(--accent); border-radius: 0; }
    .days .hover_end { background: var(--accent-mid); color: white; }
    .range-display { margin-top: 8px; font-size: 0.85rem; color: var(--muted); }
    .calendar-actions { display: flex; justify-content: flex-end; gap: 8px; margin-top: 10px; }
    .primary { background: var(--accent); color: white; border: 0; border-radius: 8px; padding: 6px 12px; cursor: pointer; }
    .ghost { background: transparent; border: 1px solid var(--line); border-radius: 8px; padding: 6px 12px; cursor: pointer; }
    .table-wrap { overflow-x: auto; background: white; border-radius: 14px; border: 1px solid var(--line); }
    table { border-collapse: collapse; width: 100%; font-size: 0.9rem; }
    th, td { padding: 8px 10px; border-bottom: 1px solid var(--line); text-align: center; }
    td:nth-child(2), th:nth-child(2) { text-align: left; }
    tfoot td { font-weight: 700; background: #eff6ff; }
    .badge { border-radius: 999px; padding: 2px 8px; font-weight: 700; }
    .badge.green { background: #dcfce7; color: #166534; }
    .badge.yellow { background: #fef9c3; color: #854d0e; }
    .badge.red { background: #fee2e2; color: #991b1b; }
    .pager { display: flex; gap: 12px; align-items: center; justify-content: space-between; }
    #pagination-nav { display: inline-flex; gap: 4px; }
    #pagination-nav a, #pagination-nav span { padding: 6px 10px; border: 1px solid var(--line); border-radius: 6px; text-decoration: none; color: var(--ink); }
    #pagination-nav a[aria-current="page"] { background: var(--accent); color: white; }
    #pagination-nav a.disabled { color: #d1d5db; pointer-events: none; }
    .bar-row { display: grid; grid-template-columns: 90px 1fr; gap: 8px; align-items: center; margin: 6px 0; font-size: 0.8rem; }
    .bar { display: flex; height: 14px; border-radius: 4px; overflow: hidden; background: var(--line); }
    .bar .pos { background: var(--accent); }
    .bar .neg { background: #fca5a5; }
    .toast { position: fixed; top: 16px; right: 16px; padding: 12px 18px; border-radius: 10px; color: white; transition: opacity 300ms ease; }
    .toast.error { background: #dc2626; }
    .toast.ok { background: #16a34a; }
    .dropdown { position: relative; }
    .dropdown-menu { position: absolute; z-index: 10; top: 40px; background: white; border: 1px solid var(--line); border-radius: 10px; padding: 10px; display: grid; gap: 4px; min-width: 220px; }
  </style>
</head>
<body data-page="{{PAGE}}">
  <aside>{{NAV}}</aside>
  <main>
    <header>
      <select id="city-select">{{CITY_OPTIONS}}</select>
      <div class="dropdown">
        <button type="button" class="trigger" id="schools-button"><span id="selected-city-schools">{{CITY_LABEL}}</span></button>
        <div class="dropdown-menu hidden" id="schools-menu">
          {{SCHOOLS}}
          <div class="calendar-actions">
            <button type="button" class="ghost" id="cancel-schools-btn">Отмена</button>
            <button type="button" class="primary" id="apply-schools-btn">Применить</button>
          </div>
        </div>
      </div>
    </header>
    {{BODY}}
  </main>

  <script>
    const page = document.body.dataset.page;
    const PICKERS = {{PICKERS}};
    const json = { 'content-type': 'application/json' };

    const toast = (message, kind) => {
      document.querySelectorAll('.toast').forEach((el) => el.remove());
      const el = document.createElement('div');
      el.className = `toast ${kind}`;
      el.textContent = message;
      document.body.appendChild(el);
      setTimeout(() => {
        el.style.opacity = '0';
        setTimeout(() => el.remove(), 300);
      }, kind === 'error' ? 5000 : 3000);
    };

    const request = async (url, options = {}) => {
      const res = await fetch(url, options);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Произошла ошибка');
      }
      return res.json();
    };

    const post = (url, body) => request(url, { method: 'POST', headers: json, body: JSON.stringify(body) });

    const fmt = (n) => Number(n).toLocaleString('ru-RU');

    const renderBars = (target, section) => {
      const el = document.getElementById(target);
      if (!el) return;
      const pie = section.pie.map((s) => `<div class="bar-row"><span>${s.name}</span><span>${fmt(s.value)}</span></div>`).join('');
      const bars = section.bar.categories.map((name, i) => {
        const pos = section.bar.positive[i];
        const neg = section.bar.negative[i];
        const total = pos + neg || 1;
        return `<div class="bar-row"><span>${name}</span><div class="bar" title="${section.bar.positive_label}: ${pos}, ${section.bar.negative_label}: ${neg}"><div class="pos" style="width:${(pos * 100) / total}%"></div><div class="neg" style="width:${(neg * 100) / total}%"></div></div></div>`;
      }).join('');
      el.innerHTML = pie + bars;
    };

    const loadAnalytics = async () => {
      const res = await request('/api/analytics');
      const s = res.data.summary;
      const cards = [
        ['Всего учащихся', s.total], ['Посетили', s.attended], ['Питание', s.nutrition],
        ['Питание 1-4', s.nutrition14], ['Питание 5-11', s.nutrition511], ['Экономия', s.savings]
      ];
      document.getElementById('summary-cards').innerHTML = cards
        .map(([label, value]) => `<article class="card"><span class="label">${label}</span><span class="value">${fmt(value)}</span></article>`)
        .join('');
      renderBars('attendance-chart', res.data.attendance);
      renderBars('nutrition-chart', res.data.nutrition);
      renderBars('library-chart', res.data.library);
    };

    const reportQuery = {};
    const badge = (value, level) => `<span class="badge ${level}">${value.toFixed(1)}%</span>`;

    const loadReports = async () => {
      const params = new URLSearchParams(Object.entries(reportQuery).filter(([, v]) => v !== undefined));
      const res = await request(`/api/reports?${params}`);
      delete reportQuery.page;
      const body = document.getElementById('table-body');
      body.innerHTML = '';
      if (res.rows.length === 0) {
        body.innerHTML = '<tr><td colspan="16">Данные не найдены</td></tr>';
      }
      res.rows.forEach((r) => {
        const tr = document.createElement('tr');
        const cells = [
          r.id, r.name, r.system.students14, r.system.students511, r.system.total_students, r.system.staff,
          r.attended.students14, r.attended.students511, r.attended.staff
        ].map((v) => {
          const td = document.createElement('td');
          td.textContent = v;
          return td;
        });
        cells.forEach((td) => tr.appendChild(td));
        tr.insertAdjacentHTML('beforeend',
          `<td>${badge(r.attended.percentage, r.attendance_badge)}</td>` +
          `<td>${r.nutrition14.received}</td><td>${r.nutrition14.not_received}</td><td>${badge(r.nutrition14.percentage, r.nutrition14_badge)}</td>` +
          `<td>${r.nutrition511.received}</td><td>${r.nutrition511.not_received}</td><td>${badge(r.nutrition511.percentage, r.nutrition511_badge)}</td>`);
        body.appendChild(tr);
      });
      const t = res.totals;
      document.getElementById('table-footer').innerHTML = `<tr><td colspan="2">Всего:</td>
        <td>${t.system.students14}</td><td>${t.system.students511}</td><td>${t.system.total_students}</td><td>${t.system.staff}</td>
        <td>${t.attended.students14}</td><td>${t.attended.students511}</td><td>${t.attended.staff}</td>
        <td>${badge(t.attended.percentage, res.attendance_badge)}</td>
        <td>${t.nutrition14.received}</td><td>${t.nutrition14.not_received}</td><td>${badge(t.nutrition14.percentage, res.nutrition14_badge)}</td>
        <td>${t.nutrition511.received}</td><td>${t.nutrition511.not_received}</td><td>${badge(t.nutrition511.percentage, res.nutrition511_badge)}</td></tr>`;

      const info = res.page;
      document.getElementById('page-start').textContent = info.page_start;
      document.getElementById('page-end').textContent = info.page_end;
      document.getElementById('total-results').textContent = info.total_results;
      document.getElementById('items-per-page').value = String(info.items_per_page);

      const nav = document.getElementById('pagination-nav');
      nav.innerHTML = '';
      const link = (text, target, enabled, current) => {
        const a = document.createElement('a');
        a.href = '#';
        a.textContent = text;
        if (!enabled) a.className = 'disabled';
        if (current) a.setAttribute('aria-current', 'page');
        a.addEventListener('click', (e) => {
          e.preventDefault();
          reportQuery.page = target;
          loadReports().catch((err) => toast(err.message, 'error'));
        });
        return a;
      };
      nav.appendChild(link('‹', info.current_page - 1, info.has_previous, false));
      info.pages.forEach((p) => {
        if (p === '...') {
          const span = document.createElement('span');
          span.textContent = '...';
          nav.appendChild(span);
        } else {
          nav.appendChild(link(String(p), p, true, p === info.current_page));
        }
      });
      nav.appendChild(link('›', info.current_page + 1, info.has_next, false));
    };

    const loadSavings = async () => {
      const selector = document.getElementById('year-selector');
      const res = await request(`/api/savings?year=${selector.value}`);
      const max = Math.max(...res.values, 1);
      document.getElementById('monthly-savings-chart').innerHTML = res.labels.map((label, i) =>
        `<div class="bar-row"><span>${label}</span><div class="bar" title="${fmt(res.values[i])} ₸"><div class="pos" style="width:${(res.values[i] * 100) / max}%"></div></div></div>`
      ).join('');
      document.getElementById('savings-total').textContent = fmt(res.total);
    };

    const refresh = () => {
      const task = page === 'analytics' ? loadAnalytics()
        : page === 'reports' ? loadReports()
        : loadSavings();
      task.catch((err) => toast(err.message, 'error'));
    };

    const summaryTab = document.getElementById('summary-tab-btn');
    const budgetTab = document.getElementById('budget-tab-btn');
    if (summaryTab && budgetTab) {
      const showTab = (budget) => {
        summaryTab.classList.toggle('tab-active', !budget);
        budgetTab.classList.toggle('tab-active', budget);
        document.getElementById('summary-tab-content').classList.toggle('hidden', budget);
        document.getElementById('budget-tab-content').classList.toggle('hidden', !budget);
      };
      summaryTab.addEventListener('click', () => showTab(false));
      budgetTab.addEventListener('click', () => showTab(true));
      document.getElementById('year-selector').addEventListener('change', refresh);
    }

    const mountPicker = (cfg) => {
      const el = (id) => document.getElementById(id);
      const trigger = el(cfg.trigger);
      const container = el(cfg.container);
      if (!trigger || !container) return;
      const days = el(cfg.days);
      const status = el(cfg.status);
      const label = el(cfg.label);
      let visible = false;
      let latest = 0;
      let hovered = null;

      const paint = (view) => {
        visible = view.visible;
        container.classList.toggle('hidden', !view.visible);
        el(cfg.month).textContent = view.month_label;
        days.innerHTML = '';
        for (let i = 0; i < view.leading_blanks; i++) {
          days.appendChild(document.createElement('div'));
        }
        view.cells.forEach((cell) => {
          const btn = document.createElement('button');
          btn.type = 'button';
          btn.textContent = cell.day;
          btn.className = cell.class + (cell.is_today ? ' today' : '');
          btn.addEventListener('click', (e) => {
            e.stopPropagation();
            send({ type: 'select_day', date: cell.date });
          });
          if (cell.hover_enabled) {
            btn.addEventListener('mouseenter', () => {
              if (hovered === cell.date) return;
              hovered = cell.date;
              send({ type: 'hover', date: cell.date });
            });
            btn.addEventListener('mouseleave', (e) => {
              if (days.contains(e.relatedTarget)) return;
              hovered = null;
              send({ type: 'leave' });
            });
          }
          days.appendChild(btn);
        });
        status.textContent = view.status || '';
        status.parentElement.classList.toggle('hidden', !view.status);
        if (view.label && label) label.textContent = view.label;
      };

      // Only the reply to the most recent event is painted.
      const send = (event) => {
        const ticket = ++latest;
        if (event.type !== 'hover') hovered = null;
        return post(`/api/picker/${cfg.id}`, event)
          .then((view) => {
            if (event.type === 'apply') refresh();
            if (ticket === latest) paint(view);
          })
          .catch((err) => toast(err.message, 'error'));
      };

      trigger.addEventListener('click', (e) => {
        e.stopPropagation();
        send({ type: 'toggle' });
      });
      el(cfg.prev).addEventListener('click', (e) => { e.stopPropagation(); send({ type: 'navigate', direction: 'previous' }); });
      el(cfg.next).addEventListener('click', (e) => { e.stopPropagation(); send({ type: 'navigate', direction: 'next' }); });
      el(cfg.cancel).addEventListener('click', () => send({ type: 'cancel' }));
      el(cfg.apply).addEventListener('click', () => send({ type: 'apply' }));
      document.addEventListener('click', (e) => {
        if (visible && !container.contains(e.target) && !trigger.contains(e.target)) {
          send({ type: 'close' });
        }
      });
    };

    PICKERS.forEach(mountPicker);

    document.querySelectorAll('.period-tab').forEach((tab) => {
      tab.addEventListener('click', () => {
        post('/api/filters/period', { period: tab.dataset.period })
          .then((filters) => {
            document.querySelectorAll('.period-tab').forEach((t) => t.classList.toggle('tab-active', t === tab));
            const label = document.getElementById('selected-date-text');
            if (label && filters.date_label) label.textContent = filters.date_label;
            refresh();
          })
          .catch((err) => toast(err.message, 'error'));
      });
    });

    document.querySelectorAll('.reports-period-tab').forEach((tab) => {
      tab.addEventListener('click', () => {
        document.querySelectorAll('.reports-period-tab').forEach((t) => t.classList.toggle('tab-active', t === tab));
        reportQuery.period = tab.dataset.period;
        refresh();
      });
    });

    const search = document.getElementById('search-input');
    if (search) {
      let timer;
      search.addEventListener('input', () => {
        clearTimeout(timer);
        timer = setTimeout(() => {
          reportQuery.search = search.value;
          refresh();
        }, 300);
      });
    }

    const perPage = document.getElementById('items-per-page');
    if (perPage) {
      perPage.addEventListener('change', () => {
        reportQuery.per_page = perPage.value;
        refresh();
      });
    }

    document.getElementById('city-select').addEventListener('change', (e) => {
      post('/api/filters/city', { city: e.target.value })
        .then(() => window.location.reload())
        .catch((err) => toast(err.message, 'error'));
    });

    const schoolsMenu = document.getElementById('schools-menu');
    document.getElementById('schools-button').addEventListener('click', (e) => {
      e.stopPropagation();
      schoolsMenu.classList.toggle('hidden');
    });
    document.getElementById('cancel-schools-btn').addEventListener('click', () => window.location.reload());
    document.getElementById('apply-schools-btn').addEventListener('click', () => {
      const ids = Array.from(document.querySelectorAll('.school-checkbox'))
        .filter((cb) => cb.checked)
        .map((cb) => Number(cb.value));
      post('/api/filters/schools', { school_ids: ids })
        .then((filters) => {
          const count = filters.selected_schools.length;
          document.getElementById('selected-city-schools').textContent =
            count === 0 ? filters.city : `${filters.city} (${count} школ)`;
          schoolsMenu.classList.add('hidden');
          toast('Фильтр применён', 'ok');
          refresh();
        })
        .catch((err) => toast(err.message, 'error'));
    });

    refresh();
  </script>
</body>
</html>
"#;
